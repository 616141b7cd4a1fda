use std::num::NonZeroU32;

use color_eyre::Report;
use governor::clock::{Clock, DefaultClock};
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};

const PER_HOUR: NonZeroU32 = nonzero(12);
const BURST: NonZeroU32 = nonzero(20);

const fn nonzero(n: u32) -> NonZeroU32 {
    match NonZeroU32::new(n) {
        Some(n) => n,
        None => panic!("quota must not be zero"),
    }
}

/// Logs sensor errors without flooding the log when a sensor is gone for
/// good.
pub(crate) struct Reporter<C: Clock = DefaultClock> {
    limiter: RateLimiter<NotKeyed, InMemoryState, C, NoOpMiddleware<C::Instant>>,
    withheld: usize,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::with_clock(DefaultClock::default())
    }
}

impl<C: Clock> Reporter<C> {
    fn with_clock(clock: C) -> Self {
        let quota = Quota::per_hour(PER_HOUR).allow_burst(BURST);
        Self {
            limiter: RateLimiter::direct_with_clock(quota, clock),
            withheld: 0,
        }
    }

    pub(crate) fn report(&mut self, report: &Report) {
        if self.limiter.check().is_err() {
            self.withheld += 1;
            return;
        }

        if self.withheld > 0 {
            tracing::warn!("Sensors keep failing, withheld {} errors", self.withheld);
            self.withheld = 0;
        }
        tracing::error!("{report:?}");
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use color_eyre::eyre::eyre;
    use governor::clock::FakeRelativeClock;

    use super::*;

    #[test]
    fn errors_beyond_the_burst_are_withheld() {
        logger::setup_for_tests();
        let mut reporter = Reporter::with_clock(FakeRelativeClock::default());
        let report = eyre!("am2315 not answering");

        for _ in 0..BURST.get() {
            reporter.report(&report);
        }
        assert_eq!(reporter.withheld, 0);

        for _ in 0..5 {
            reporter.report(&report);
        }
        assert_eq!(reporter.withheld, 5);
    }

    #[test]
    fn withheld_count_resets_once_quota_refills() {
        logger::setup_for_tests();
        let clock = FakeRelativeClock::default();
        let mut reporter = Reporter::with_clock(clock.clone());
        let report = eyre!("tsl2561 not answering");

        for _ in 0..BURST.get() + 3 {
            reporter.report(&report);
        }
        assert_eq!(reporter.withheld, 3);

        // one report every five minutes
        clock.advance(Duration::from_secs(5 * 60 + 1));
        reporter.report(&report);
        assert_eq!(reporter.withheld, 0);
        reporter.report(&report);
        assert_eq!(reporter.withheld, 1);
    }
}
