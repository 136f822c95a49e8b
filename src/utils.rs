use crate::error::Result;
use rand::Rng;
use std::fs;
use std::path::Path;
use std::time::Duration;

pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Pause range between requests, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pause {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl Pause {
    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        Self {
            min_ms: min_ms.min(max_ms),
            max_ms: min_ms.max(max_ms),
        }
    }

    pub fn none() -> Self {
        Self::new(0, 0)
    }

    pub fn pick(&self) -> Duration {
        if self.max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(self.min_ms..=self.max_ms))
    }

    pub async fn sleep(&self) {
        let wait = self.pick();
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pause_stays_in_range() {
        let pause = Pause::new(300, 1000);
        for _ in 0..50 {
            let wait = pause.pick();
            assert!(wait >= Duration::from_millis(300));
            assert!(wait <= Duration::from_millis(1000));
        }
        assert_eq!(Pause::none().pick(), Duration::ZERO);
        assert_eq!(Pause::new(900, 100), Pause::new(100, 900));
    }

    #[test]
    fn creates_missing_parent() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested/out/results.csv");
        ensure_parent_dir(&target).unwrap();
        assert!(target.parent().unwrap().is_dir());
        ensure_parent_dir(Path::new("results.csv")).unwrap();
    }
}
