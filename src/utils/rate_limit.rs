use std::sync::Arc;
use tokio::sync::{AcquireError, Semaphore, SemaphorePermit};

/// Bounds the number of APOD requests in flight at once.
pub struct RateLimiter {
    semaphore: Arc<Semaphore>,
}

impl RateLimiter {
    pub fn new(max_concurrent: usize) -> Self {
        RateLimiter {
            semaphore: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    pub async fn acquire(&self) -> Result<SemaphorePermit<'_>, AcquireError> {
        self.semaphore.acquire().await
    }

    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_permits_are_returned_on_drop() {
        let limiter = RateLimiter::new(2);
        {
            let _a = limiter.acquire().await.unwrap();
            let _b = limiter.acquire().await.unwrap();
            assert_eq!(limiter.available(), 0);
        }
        assert_eq!(limiter.available(), 2);
    }

    #[test]
    fn test_zero_is_raised_to_one() {
        assert_eq!(RateLimiter::new(0).available(), 1);
    }
}
