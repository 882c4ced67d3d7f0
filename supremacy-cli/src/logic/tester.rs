use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use super::catalog::{Scenario, find_scenario};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_key: String,
    pub scenario_name: String,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
}

/// Runs catalog scenarios against the engine.
pub struct ScenarioRunner {
    verbose: bool,
}

impl ScenarioRunner {
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Run each named scenario; unknown names are reported and skipped.
    pub fn run_all(&self, keys: &[String], iterations: usize) -> Vec<ScenarioResult> {
        let mut results = Vec::new();
        for key in keys {
            if let Some(scenario) = find_scenario(key) {
                results.push(self.run_scenario(&scenario, iterations));
            } else {
                eprintln!("⚠️  Unknown scenario: {}", key.yellow());
            }
        }
        results
    }

    pub fn run_scenario(&self, scenario: &Scenario, iterations: usize) -> ScenarioResult {
        if self.verbose {
            println!(
                "🧪 Checking scenario: {} ({})",
                scenario.name.bright_white(),
                scenario.key
            );
        }

        let iterations = iterations.max(1);
        let mut successes = 0;
        let mut failures = Vec::new();
        let mut elapsed = Duration::ZERO;
        for iteration in 0..iterations {
            let started = Instant::now();
            let outcome = scenario.run();
            elapsed += started.elapsed();
            match outcome {
                Ok(()) => successes += 1,
                Err(err) => {
                    log::debug!("{} iteration {iteration} failed: {err:#}", scenario.key);
                    failures.push(format!("Iteration {iteration}: {err:#}"));
                }
            }
        }

        ScenarioResult {
            scenario_key: scenario.key.to_string(),
            scenario_name: scenario.name.to_string(),
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: successes,
            failures,
            average_duration: elapsed / u32::try_from(iterations).unwrap_or(u32::MAX),
        }
    }
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_micros().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let micros = u128::deserialize(deserializer)?;
        Ok(Duration::from_micros(u64::try_from(micros).unwrap_or(0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runner_reports_passing_scenarios() {
        let runner = ScenarioRunner::new(false);
        let results = runner.run_all(&["cumulative-stacking".to_string()], 3);
        assert_eq!(results.len(), 1);
        let result = &results[0];
        assert!(result.passed);
        assert_eq!(result.iterations_run, 3);
        assert_eq!(result.successful_iterations, 3);
        assert_eq!(result.scenario_name, "Cumulative Tier Stacking");
    }

    #[test]
    fn unknown_scenarios_are_skipped() {
        let runner = ScenarioRunner::new(false);
        let results = runner.run_all(&["no-such-check".to_string()], 1);
        assert!(results.is_empty());
    }

    #[test]
    fn zero_iterations_still_run_once() {
        let runner = ScenarioRunner::new(true);
        let scenario = find_scenario("weekly-resets").unwrap();
        assert_eq!(runner.run_scenario(&scenario, 0).iterations_run, 1);
    }

    #[test]
    fn results_serialize_duration_as_micros() {
        let result = ScenarioResult {
            scenario_key: "k".to_string(),
            scenario_name: "K".to_string(),
            passed: true,
            iterations_run: 1,
            successful_iterations: 1,
            failures: Vec::new(),
            average_duration: Duration::from_micros(1500),
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["average_duration"], 1500);
        let back: ScenarioResult = serde_json::from_value(value).unwrap();
        assert_eq!(back.average_duration, Duration::from_micros(1500));
    }
}
