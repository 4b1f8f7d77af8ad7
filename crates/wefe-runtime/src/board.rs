//! Chart surfaces held as entities in an ECS world.
//!
//! Each surface entity points at exactly one live chart entity. Rendering
//! despawns the previous chart before spawning the next one.

use crate::Redraw;
use bevy_ecs::prelude::*;
use std::collections::BTreeMap;
use tracing::debug;
use wefe_charts::{MetricFamily, SeriesBundle};

/// Rendering target for one metric family.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSurface {
    pub family: MetricFamily,
    live: Option<Entity>,
}

/// The rendering resource currently shown on a surface.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct LiveChart {
    pub family: MetricFamily,
    pub bundle: SeriesBundle,
    /// Monotonic across the board; later renders have larger values.
    pub generation: u64,
}

/// Counters of chart resources created and released.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RenderStats {
    pub created: u64,
    pub released: u64,
}

impl RenderStats {
    pub fn live(&self) -> u64 {
        self.created - self.released
    }
}

/// The four chart surfaces of the dashboard.
pub struct ChartBoard {
    world: World,
    surfaces: BTreeMap<MetricFamily, Entity>,
}

impl Default for ChartBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartBoard {
    pub fn new() -> Self {
        let mut world = World::new();
        world.insert_resource(RenderStats::default());
        let surfaces = MetricFamily::ALL
            .iter()
            .map(|&family| {
                let id = world.spawn(ChartSurface { family, live: None }).id();
                (family, id)
            })
            .collect();
        Self { world, surfaces }
    }

    /// Replace whatever the bundle's surface shows. No caching: every call is
    /// a full redraw, and the previous chart is released first.
    pub fn render(&mut self, bundle: SeriesBundle) {
        let family = bundle.family;
        let surface = self.surfaces[&family];
        let previous = self
            .world
            .get_mut::<ChartSurface>(surface)
            .and_then(|mut s| s.live.take());
        if let Some(old) = previous {
            if self.world.despawn(old) {
                self.world.resource_mut::<RenderStats>().released += 1;
            }
        }
        let generation = {
            let mut stats = self.world.resource_mut::<RenderStats>();
            stats.created += 1;
            stats.created
        };
        let live = self
            .world
            .spawn(LiveChart {
                family,
                bundle,
                generation,
            })
            .id();
        if let Some(mut s) = self.world.get_mut::<ChartSurface>(surface) {
            s.live = Some(live);
        }
        debug!(family = family.key(), generation, "chart redrawn");
    }

    pub fn apply<I: IntoIterator<Item = Redraw>>(&mut self, redraws: I) {
        for redraw in redraws {
            self.render(redraw.bundle);
        }
    }

    /// Live chart on a surface, if anything was rendered yet.
    pub fn current(&self, family: MetricFamily) -> Option<&LiveChart> {
        let surface = self.world.get::<ChartSurface>(*self.surfaces.get(&family)?)?;
        self.world.get::<LiveChart>(surface.live?)
    }

    /// Number of live chart entities for a family.
    pub fn live_count(&mut self, family: MetricFamily) -> usize {
        self.world
            .query::<&LiveChart>()
            .iter(&self.world)
            .filter(|c| c.family == family)
            .count()
    }

    pub fn total_live(&mut self) -> usize {
        self.world.query::<&LiveChart>().iter(&self.world).count()
    }

    pub fn stats(&self) -> RenderStats {
        *self.world.resource::<RenderStats>()
    }
}

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Plain-text rendering: a header with the year span and one sparkline per
/// series, scaled to that series' own range, tagged with the series colour
/// and followed by its last value.
pub fn sketch(bundle: &SeriesBundle) -> String {
    let mut out = format!("[{}]", bundle.family.key());
    if let (Some(first), Some(last)) = (bundle.labels.first(), bundle.labels.last()) {
        out.push_str(&format!(" {first}..{last}"));
    }
    out.push('\n');
    for series in &bundle.series {
        let (lo, hi) = series
            .values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        let span = hi - lo;
        let line: String = series
            .values
            .iter()
            .map(|&v| {
                let idx = if span > 0.0 {
                    ((v - lo) / span * 7.0).round() as usize
                } else {
                    0
                };
                BARS[idx.min(BARS.len() - 1)]
            })
            .collect();
        let last = series.values.last().copied().unwrap_or(f64::NAN);
        out.push_str(&format!(
            "  {:<36} {} {} {:.2}\n",
            series.label,
            series.color.hex(),
            line,
            last
        ));
    }
    out
}
