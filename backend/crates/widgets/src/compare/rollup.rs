use serde_json::{json, Value};

use super::SectionEntry;
use crate::postprocess::dates::format_duration;
use crate::postprocess::percent::{average, cap_at_hundred, percentage, round, round2};
use crate::postprocess::raw::{doc_count, metric, term_count};

/// Display values of one node, produced from its accumulator.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub section: Vec<SectionEntry>,
    pub total_value: Value,
    pub value_in_millis: Option<i64>,
    pub numerator: Option<i64>,
    pub denominator: Option<i64>,
    pub difference_in_days: Option<i64>,
}

impl Rendered {
    fn new(section: Vec<SectionEntry>, total_value: impl Into<Value>) -> Self {
        Self {
            section,
            total_value: total_value.into(),
            value_in_millis: None,
            numerator: None,
            denominator: None,
            difference_in_days: None,
        }
    }
}

/// Per-metric reduction rule for comparison trees.
pub trait Rollup: Send + Sync {
    type Acc: Clone + Default + Send + Sync;

    /// Accumulator of one component (or of a whole scope) read from its
    /// aggregation bucket; `None` means no data in the window.
    fn leaf(&self, bucket: Option<&Value>, window_days: i64) -> Self::Acc;

    fn combine(&self, into: &mut Self::Acc, child: &Self::Acc);

    fn render(&self, acc: &Self::Acc) -> Rendered;
}

// ── Count ──

#[derive(Debug, Clone)]
pub struct CountRollup {
    title: &'static str,
    presence: bool,
}

impl CountRollup {
    pub fn new(title: &'static str) -> Self {
        Self {
            title,
            presence: false,
        }
    }

    /// Count each component with a non-zero value once.
    pub fn presence(title: &'static str) -> Self {
        Self {
            title,
            presence: true,
        }
    }
}

impl Rollup for CountRollup {
    type Acc = i64;

    fn leaf(&self, bucket: Option<&Value>, _window_days: i64) -> i64 {
        let n = bucket.map(|b| round(metric(b, "value"))).unwrap_or(0);
        if self.presence {
            i64::from(n > 0)
        } else {
            n
        }
    }

    fn combine(&self, into: &mut i64, child: &i64) {
        *into += child;
    }

    fn render(&self, acc: &i64) -> Rendered {
        Rendered::new(vec![SectionEntry::new(self.title, *acc)], *acc)
    }
}

// ── Distribution ──

#[derive(Debug, Clone)]
pub struct DistributionRollup {
    path: &'static [&'static str],
    categories: &'static [(&'static str, &'static str)],
}

impl DistributionRollup {
    /// `path` leads from the bucket to the terms aggregation; `categories` are
    /// `(term key, title)` pairs in display order.
    pub fn new(
        path: &'static [&'static str],
        categories: &'static [(&'static str, &'static str)],
    ) -> Self {
        Self { path, categories }
    }

    pub fn categories(&self) -> &'static [(&'static str, &'static str)] {
        self.categories
    }
}

impl Rollup for DistributionRollup {
    type Acc = Vec<i64>;

    fn leaf(&self, bucket: Option<&Value>, _window_days: i64) -> Vec<i64> {
        let Some(bucket) = bucket else {
            return vec![0; self.categories.len()];
        };
        let terms = self.path.iter().fold(bucket, |v, key| &v[*key]);
        self.categories
            .iter()
            .map(|(key, _)| term_count(terms, key))
            .collect()
    }

    fn combine(&self, into: &mut Vec<i64>, child: &Vec<i64>) {
        if into.len() < child.len() {
            into.resize(child.len(), 0);
        }
        for (a, b) in into.iter_mut().zip(child) {
            *a += b;
        }
    }

    fn render(&self, acc: &Vec<i64>) -> Rendered {
        let section = self
            .categories
            .iter()
            .enumerate()
            .map(|(i, (_, title))| SectionEntry::new(title, acc.get(i).copied().unwrap_or(0)))
            .collect();
        Rendered::new(section, acc.iter().sum::<i64>())
    }
}

// ── Time average ──

#[derive(Debug, Clone)]
pub struct TimeAverageRollup {
    title: &'static str,
}

impl TimeAverageRollup {
    pub fn new(title: &'static str) -> Self {
        Self { title }
    }
}

/// `(sum_ms, count)`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimeAcc {
    pub sum_ms: f64,
    pub count: f64,
}

impl Rollup for TimeAverageRollup {
    type Acc = TimeAcc;

    fn leaf(&self, bucket: Option<&Value>, _window_days: i64) -> TimeAcc {
        bucket
            .map(|b| TimeAcc {
                sum_ms: metric(b, "time"),
                count: metric(b, "items"),
            })
            .unwrap_or_default()
    }

    fn combine(&self, into: &mut TimeAcc, child: &TimeAcc) {
        into.sum_ms += child.sum_ms;
        into.count += child.count;
    }

    fn render(&self, acc: &TimeAcc) -> Rendered {
        let avg = average(acc.sum_ms, acc.count);
        let mut entry = SectionEntry::new(self.title, format_duration(avg));
        entry.value_in_millis = Some(avg);
        let mut rendered = Rendered::new(vec![entry], format_duration(avg));
        rendered.value_in_millis = Some(avg);
        rendered
    }
}

// ── Time breakdown ──

#[derive(Debug, Clone)]
pub struct TimeBreakdownRollup {
    stages: &'static [(&'static str, &'static str)],
}

impl TimeBreakdownRollup {
    /// `stages` are `(sum aggregation, title)` pairs; every stage shares the
    /// `items` count.
    pub fn new(stages: &'static [(&'static str, &'static str)]) -> Self {
        Self { stages }
    }

    /// Average milliseconds per stage, in stage order.
    pub fn stage_averages(&self, acc: &[TimeAcc]) -> Vec<i64> {
        (0..self.stages.len())
            .map(|i| {
                acc.get(i)
                    .map(|s| average(s.sum_ms, s.count))
                    .unwrap_or(0)
            })
            .collect()
    }
}

impl Rollup for TimeBreakdownRollup {
    type Acc = Vec<TimeAcc>;

    fn leaf(&self, bucket: Option<&Value>, _window_days: i64) -> Vec<TimeAcc> {
        let Some(bucket) = bucket else {
            return vec![TimeAcc::default(); self.stages.len()];
        };
        let items = metric(bucket, "items");
        self.stages
            .iter()
            .map(|(agg, _)| TimeAcc {
                sum_ms: metric(bucket, agg),
                count: items,
            })
            .collect()
    }

    fn combine(&self, into: &mut Vec<TimeAcc>, child: &Vec<TimeAcc>) {
        if into.len() < child.len() {
            into.resize(child.len(), TimeAcc::default());
        }
        for (a, b) in into.iter_mut().zip(child) {
            a.sum_ms += b.sum_ms;
            a.count += b.count;
        }
    }

    fn render(&self, acc: &Vec<TimeAcc>) -> Rendered {
        let averages = self.stage_averages(acc);
        let total: i64 = averages.iter().sum();
        let mut shares: Vec<i64> = averages
            .iter()
            .map(|&avg| percentage(avg as f64, total as f64))
            .collect();
        cap_at_hundred(&mut shares);

        let section = self
            .stages
            .iter()
            .zip(shares.iter().zip(&averages))
            .map(|((_, title), (&share, &avg))| SectionEntry {
                title: title.to_string(),
                value: json!(share),
                value_in_millis: Some(avg),
            })
            .collect();
        let mut rendered = Rendered::new(section, format_duration(total));
        rendered.value_in_millis = Some(total);
        rendered
    }
}

// ── Ratio ──

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatioKind {
    /// active / (active + wait)
    FlowEfficiency,
    /// wait / (active + wait)
    WaitTime,
    /// failed runs / runs
    FailureRate,
}

#[derive(Debug, Clone)]
pub struct RatioRollup {
    title: &'static str,
    kind: RatioKind,
}

impl RatioRollup {
    pub fn new(title: &'static str, kind: RatioKind) -> Self {
        Self { title, kind }
    }
}

impl Rollup for RatioRollup {
    type Acc = (f64, f64);

    fn leaf(&self, bucket: Option<&Value>, _window_days: i64) -> (f64, f64) {
        let Some(b) = bucket else {
            return (0.0, 0.0);
        };
        match self.kind {
            RatioKind::FlowEfficiency => {
                let active = metric(b, "active");
                (active, active + metric(b, "wait"))
            }
            RatioKind::WaitTime => {
                let wait = metric(b, "wait");
                (wait, metric(b, "active") + wait)
            }
            RatioKind::FailureRate => (doc_count(&b["failed"]) as f64, metric(b, "value")),
        }
    }

    fn combine(&self, into: &mut (f64, f64), child: &(f64, f64)) {
        into.0 += child.0;
        into.1 += child.1;
    }

    fn render(&self, acc: &(f64, f64)) -> Rendered {
        let pct = percentage(acc.0, acc.1);
        let mut rendered = Rendered::new(vec![SectionEntry::new(self.title, pct)], pct);
        rendered.numerator = Some(round(acc.0));
        rendered.denominator = Some(round(acc.1));
        rendered
    }
}

// ── DORA deployment frequency ──

#[derive(Debug, Clone, Default)]
pub struct DoraFrequencyRollup;

/// `(deployments, difference_days)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DoraAcc {
    pub deployments: i64,
    pub days: i64,
}

impl Rollup for DoraFrequencyRollup {
    type Acc = DoraAcc;

    fn leaf(&self, bucket: Option<&Value>, window_days: i64) -> DoraAcc {
        DoraAcc {
            deployments: bucket.map(|b| round(metric(b, "value"))).unwrap_or(0),
            days: window_days,
        }
    }

    // Deployments add up; the window length is taken from the first child
    // that has one and never summed.
    fn combine(&self, into: &mut DoraAcc, child: &DoraAcc) {
        into.deployments += child.deployments;
        if into.days == 0 {
            into.days = child.days;
        }
    }

    fn render(&self, acc: &DoraAcc) -> Rendered {
        let per_day = if acc.days > 0 {
            round2(acc.deployments as f64 / acc.days as f64)
        } else {
            0.0
        };
        let mut rendered = Rendered::new(
            vec![SectionEntry::new("Deployments per day", per_day)],
            per_day,
        );
        rendered.numerator = Some(acc.deployments);
        rendered.difference_in_days = Some(acc.days);
        rendered
    }
}
