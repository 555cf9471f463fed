//! Chemical mixing and the blended quality score.

use rand::Rng;
use smallvec::SmallVec;

use crate::phase::{Phase, PhaseContext, PhaseError};
use crate::phases::round2;

/// Minimum reservoir fill for a chemical to feed the mixer.
const MIN_FEED_FILL: f64 = 5.0;
/// Quality lost per unit of flow beyond the mixer's throughput.
const OVERLOAD_PENALTY: f64 = 0.5;
/// Quality jitters uniformly within this band per mixing tick.
const QUALITY_JITTER: f64 = 1.0;
/// Fill consumed per tick is this fraction of the feed rate.
const FEED_CONSUMPTION: f64 = 0.1;

const NAME: &str = "mixer";
const ACTIVE_KEY: &str = "mixer.active";
const THROUGHPUT_KEY: &str = "mixer.max_throughput";
const QUALITY_KEY: &str = "mixer.mixture_quality";

struct FeedKeys {
    value: String,
    purity: String,
    output: String,
    active: String,
}

/// Per-tick blend across the chemical reservoirs.
///
/// Contributors are the active chemicals with enough fill and a
/// positive feed rate. The blended quality is the feed-weighted mean
/// purity, minus an overload penalty when the combined flow exceeds
/// the mixer's throughput, plus a small jitter, rounded and held in
/// [0, 100]. Each contributor burns fill proportional to its feed
/// rate. With no contributors, or the mixer off, quality reads zero
/// and nothing is consumed.
pub struct MixerPhase {
    feeds: Vec<FeedKeys>,
}

impl MixerPhase {
    /// Build the phase over the named chemical reservoirs.
    pub fn new(chemicals: &[&str]) -> Self {
        Self {
            feeds: chemicals
                .iter()
                .map(|c| FeedKeys {
                    value: format!("{c}.value"),
                    purity: format!("{c}.purity"),
                    output: format!("{c}.output"),
                    active: format!("{c}.active"),
                })
                .collect(),
        }
    }
}

impl Phase for MixerPhase {
    fn name(&self) -> &str {
        NAME
    }

    fn step(&mut self, ctx: &mut PhaseContext<'_>) -> Result<(), PhaseError> {
        if !ctx.vars.flag(ACTIVE_KEY)? {
            ctx.vars.set_float(QUALITY_KEY, 0.0)?;
            return Ok(());
        }

        let mut contributors: SmallVec<[usize; 4]> = SmallVec::new();
        let mut total_flow = 0.0;
        let mut weighted_purity = 0.0;
        for (i, feed) in self.feeds.iter().enumerate() {
            if !ctx.vars.flag(&feed.active)? {
                continue;
            }
            let fill = ctx.vars.float(&feed.value)?;
            let rate = ctx.vars.float(&feed.output)?;
            if fill > MIN_FEED_FILL && rate > 0.0 {
                contributors.push(i);
                total_flow += rate;
                weighted_purity += ctx.vars.float(&feed.purity)? * rate;
            }
        }

        if contributors.is_empty() {
            ctx.vars.set_float(QUALITY_KEY, 0.0)?;
            return Ok(());
        }

        let throughput = ctx.vars.float(THROUGHPUT_KEY)?;
        let overload = (total_flow - throughput).max(0.0);
        let jitter = ctx.rng.gen_range(-QUALITY_JITTER..=QUALITY_JITTER);
        let quality = weighted_purity / total_flow - OVERLOAD_PENALTY * overload + jitter;
        ctx.vars
            .set_float(QUALITY_KEY, round2(quality.clamp(0.0, 100.0)))?;

        for i in contributors {
            let feed = &self.feeds[i];
            let fill = ctx.vars.float(&feed.value)?;
            let burn = FEED_CONSUMPTION * ctx.vars.float(&feed.output)?;
            ctx.vars.set_float(&feed.value, round2((fill - burn).max(0.0)))?;
        }
        Ok(())
    }
}
