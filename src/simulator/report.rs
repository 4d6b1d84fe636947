//! Simulation report generation.

use crate::enemy::EnemyRarity;
use serde::Serialize;
use std::collections::BTreeMap;

/// Statistics for a single run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunStats {
    pub final_level: u32,
    pub final_world_level: u32,
    pub reached_target: bool,
    pub total_kills: u64,
    pub total_xp: u64,
    pub boss_kills: u64,
    pub points_spent: u32,
    /// Kill count at which each level was reached
    pub kills_at_level: BTreeMap<u32, u64>,
    /// Spawns per rarity tier, indexed Common..Mythic
    pub rarity_counts: [u64; 6],
    /// Spawns carrying each modifier, keyed by prefix
    pub modifier_counts: BTreeMap<String, u64>,
}

impl RunStats {
    pub fn new() -> Self {
        Self {
            final_level: 1,
            final_world_level: 1,
            reached_target: false,
            total_kills: 0,
            total_xp: 0,
            boss_kills: 0,
            points_spent: 0,
            kills_at_level: BTreeMap::new(),
            rarity_counts: [0; 6],
            modifier_counts: BTreeMap::new(),
        }
    }

    pub fn record_spawn<'a>(&mut self, rarity: EnemyRarity, prefixes: impl Iterator<Item = &'a str>) {
        self.rarity_counts[rarity.index() as usize] += 1;
        for prefix in prefixes {
            *self.modifier_counts.entry(prefix.to_string()).or_insert(0) += 1;
        }
    }

    pub fn record_level(&mut self, level: u32) {
        self.kills_at_level.entry(level).or_insert(self.total_kills);
    }

    pub fn xp_per_kill(&self) -> f64 {
        if self.total_kills == 0 {
            0.0
        } else {
            self.total_xp as f64 / self.total_kills as f64
        }
    }
}

impl Default for RunStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Aggregated results from multiple simulation runs.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub num_runs: u32,
    pub runs_completed: u32,
    pub target_level: u32,

    // Aggregated stats
    pub avg_final_level: f64,
    pub avg_final_world_level: f64,
    pub avg_total_kills: f64,
    pub avg_xp_per_kill: f64,
    pub avg_boss_kills: f64,
    pub avg_points_spent: f64,

    /// Average kills needed to reach each level, over runs that reached it
    pub avg_kills_to_level: BTreeMap<u32, f64>,

    /// Share of all spawns per rarity name
    pub rarity_distribution: BTreeMap<String, f64>,

    /// Share of all spawns carrying each modifier
    pub modifier_frequency: BTreeMap<String, f64>,

    // Individual run stats for detailed analysis
    pub run_stats: Vec<RunStats>,
}

impl SimReport {
    /// Create a new report from completed run stats.
    pub fn from_runs(runs: Vec<RunStats>, target_level: u32) -> Self {
        let num_runs = runs.len() as u32;
        let divisor = num_runs.max(1) as f64;
        let runs_completed = runs.iter().filter(|r| r.reached_target).count() as u32;

        let avg_final_level = average(&runs, divisor, |r| r.final_level as f64);
        let avg_final_world_level = average(&runs, divisor, |r| r.final_world_level as f64);
        let avg_total_kills = average(&runs, divisor, |r| r.total_kills as f64);
        let avg_xp_per_kill = average(&runs, divisor, RunStats::xp_per_kill);
        let avg_boss_kills = average(&runs, divisor, |r| r.boss_kills as f64);
        let avg_points_spent = average(&runs, divisor, |r| r.points_spent as f64);

        // Level pacing
        let mut level_totals: BTreeMap<u32, (u64, u32)> = BTreeMap::new();
        for run in &runs {
            for (level, kills) in &run.kills_at_level {
                let entry = level_totals.entry(*level).or_insert((0, 0));
                entry.0 += kills;
                entry.1 += 1;
            }
        }
        let avg_kills_to_level = level_totals
            .into_iter()
            .map(|(level, (kills, count))| (level, kills as f64 / count as f64))
            .collect();

        // Encounter mix
        let mut rarity_totals = [0u64; 6];
        let mut modifier_totals: BTreeMap<String, u64> = BTreeMap::new();
        for run in &runs {
            for (i, count) in run.rarity_counts.iter().enumerate() {
                rarity_totals[i] += count;
            }
            for (prefix, count) in &run.modifier_counts {
                *modifier_totals.entry(prefix.clone()).or_insert(0) += count;
            }
        }
        let total_spawns = rarity_totals.iter().sum::<u64>().max(1) as f64;
        let rarity_distribution = EnemyRarity::ALL
            .iter()
            .map(|r| {
                (
                    r.name().to_string(),
                    rarity_totals[r.index() as usize] as f64 / total_spawns,
                )
            })
            .collect();
        let modifier_frequency = modifier_totals
            .into_iter()
            .map(|(prefix, count)| (prefix, count as f64 / total_spawns))
            .collect();

        Self {
            num_runs,
            runs_completed,
            target_level,
            avg_final_level,
            avg_final_world_level,
            avg_total_kills,
            avg_xp_per_kill,
            avg_boss_kills,
            avg_points_spent,
            avg_kills_to_level,
            rarity_distribution,
            modifier_frequency,
            run_stats: runs,
        }
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════════\n");
        report.push_str("                    PROGRESSION SIMULATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Runs: {} | Reached level {}: {}\n\n",
            self.num_runs, self.target_level, self.runs_completed
        ));

        report.push_str("── PROGRESSION ──────────────────────────────────────────────────\n");
        report.push_str(&format!("  Avg Final Level:     {:.1}\n", self.avg_final_level));
        report.push_str(&format!("  Avg World Level:     {:.1}\n", self.avg_final_world_level));
        report.push_str(&format!("  Avg Total Kills:     {:.0}\n", self.avg_total_kills));
        report.push_str(&format!("  Avg XP per Kill:     {:.1}\n", self.avg_xp_per_kill));
        report.push_str(&format!("  Avg Boss Kills:      {:.1}\n", self.avg_boss_kills));
        report.push_str(&format!("  Avg Points Spent:    {:.1}\n\n", self.avg_points_spent));

        report.push_str("── RARITY ───────────────────────────────────────────────────────\n");
        for rarity in EnemyRarity::ALL {
            let share = self.rarity_distribution.get(rarity.name()).copied().unwrap_or(0.0);
            let pct = share * 100.0;
            let bar: String = "█".repeat((pct / 2.5) as usize);
            report.push_str(&format!("  {:<10} {:>6.2}% {}\n", rarity.name(), pct, bar));
        }
        report.push('\n');

        report.push_str("── MODIFIERS (share of spawns) ──────────────────────────────────\n");
        let mut modifiers: Vec<(&String, &f64)> = self.modifier_frequency.iter().collect();
        modifiers.sort_by(|a, b| b.1.total_cmp(a.1));
        for (prefix, share) in modifiers {
            report.push_str(&format!("  {:<14} {:>6.2}%\n", prefix, share * 100.0));
        }
        report.push('\n');

        report
    }

    /// Kills needed to reach each level.
    pub fn level_curve_text(&self) -> String {
        let mut report = String::new();
        report.push_str("── LEVEL CURVE ──────────────────────────────────────────────────\n");
        report.push_str("  Level   Avg Kills   Kills Since Previous\n");
        report.push_str("  ─────   ─────────   ────────────────────\n");
        let mut previous = 0.0;
        for (level, kills) in &self.avg_kills_to_level {
            report.push_str(&format!(
                "  {:5}   {:9.1}   {:20.1}\n",
                level,
                kills,
                kills - previous
            ));
            previous = *kills;
        }
        report
    }

    /// Serialize the report as pretty JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

fn average(runs: &[RunStats], divisor: f64, f: impl Fn(&RunStats) -> f64) -> f64 {
    runs.iter().map(f).sum::<f64>() / divisor
}
