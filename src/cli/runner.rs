use anyhow::Result;
use chrono::Local;
use colored::Colorize;
use std::{future::Future, time::Duration};
use tokio::time::sleep;

/// Run `f` once, or forever with `interval` between the runs. In a loop a
/// failed run is reported and the next one is attempted.
///
/// # Errors
/// Will return the error of `f` when running once
pub async fn run_with_optional_interval<F, Fut>(interval: Option<Duration>, mut f: F) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let Some(interval) = interval else {
        return f().await;
    };

    loop {
        println!("{}", format!("[{}]", Local::now().format("%H:%M:%S")).dimmed());

        if let Err(err) = f().await {
            log::error!("run failed: {err:#}");
            eprintln!("{}", format!("Error: {err:#}").red());
        }

        log::info!("next run in {}s", interval.as_secs());

        sleep(interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_run_once() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);

        run_with_optional_interval(None, || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        })
        .await
        .unwrap();

        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_run_once_error() {
        let result = run_with_optional_interval(None, || async { Err(anyhow!("boom")) }).await;
        assert!(result.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_interval_survives_errors() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);

        let result = timeout(
            Duration::from_secs(25),
            run_with_optional_interval(Some(Duration::from_secs(10)), || {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(anyhow!("boom"))
                }
            }),
        )
        .await;

        // runs at 0s, 10s and 20s, then the timeout fires
        assert!(result.is_err());
        assert_eq!(runs.load(Ordering::SeqCst), 3);
    }
}
