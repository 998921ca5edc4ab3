// SPDX-License-Identifier: MIT

//! In-memory AST of a single workflow file.
//!
//! Known fields are pulled out onto [`Job`]/[`Step`] as typed data; everything
//! else is kept in an `extra` mapping and re-emitted verbatim on serialization,
//! so a workflow this module doesn't understand still round-trips.

use indexmap::IndexMap;
use serde_yaml::{Mapping, Value};

use crate::error::TransformError;

/// One workflow file, parsed into jobs plus whatever top-level keys (`on`, `name`,
/// `env`, `permissions`, ...) the transformer doesn't touch.
#[derive(Debug, Clone)]
pub struct WorkflowDocument {
    /// Top-level keys other than `jobs`, preserved verbatim.
    pub extra: Mapping,
    /// Jobs in file order. Iteration/insertion order is preserved; the manifest
    /// sorts by id independently (see `manifest::build`).
    pub jobs: IndexMap<String, Job>,
}

/// `needs:` accepts either a bare string or a sequence of strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Needs {
    One(String),
    Many(Vec<String>),
}

impl Needs {
    pub fn as_vec(&self) -> Vec<String> {
        match self {
            Needs::One(s) => vec![s.clone()],
            Needs::Many(v) => v.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Job {
    pub name: Option<String>,
    pub runs_on: Option<Value>,
    pub steps: Vec<Step>,
    pub needs: Option<Needs>,
    /// Present iff this job invokes a reusable sub-workflow; such jobs are never
    /// structurally rewritten beyond the sensitivity/continue-on-error injections
    /// and never receive marker steps (they have no `steps` of their own).
    pub uses: Option<String>,
    pub timeout_minutes: Option<u32>,
    pub continue_on_error: Option<bool>,
    pub if_expr: Option<String>,
    /// Unknown job-level keys (`env`, `permissions`, `strategy`, `services`, ...).
    pub extra: Mapping,
}

#[derive(Debug, Clone)]
pub struct Step {
    pub name: Option<String>,
    pub id: Option<String>,
    pub run: Option<String>,
    pub uses: Option<String>,
    pub timeout_minutes: Option<u32>,
    pub if_expr: Option<String>,
    /// Unknown step-level keys (`with`, `env`, `shell`, ...).
    pub extra: Mapping,
}

const TIMEOUT_MINUTES_KEY: &str = "timeout-minutes";
const CONTINUE_ON_ERROR_KEY: &str = "continue-on-error";

impl Job {
    /// True if `timeout-minutes` was present but held an unrecognized value
    /// (e.g. an expression) and so was preserved raw in `extra` rather than
    /// parsed into `timeout_minutes`. Callers use this to tell "no timeout
    /// declared" from "a timeout is declared but isn't a plain integer" —
    /// only the former should get a default injected (spec.md §4.5 step 6).
    pub fn has_raw_timeout_minutes(&self) -> bool {
        self.extra
            .contains_key(&Value::String(TIMEOUT_MINUTES_KEY.to_string()))
    }

    /// Drops any raw, unparsed `continue-on-error` value from `extra`. Step 4
    /// forces `continueOnError = true` unconditionally, so a stale raw
    /// expression left in `extra` must not be allowed to override the typed
    /// field on serialization.
    pub fn clear_raw_continue_on_error(&mut self) {
        self.extra
            .remove(&Value::String(CONTINUE_ON_ERROR_KEY.to_string()));
    }
}

impl Step {
    /// See [`Job::has_raw_timeout_minutes`]; same rule for step-level timeouts.
    pub fn has_raw_timeout_minutes(&self) -> bool {
        self.extra
            .contains_key(&Value::String(TIMEOUT_MINUTES_KEY.to_string()))
    }
}

fn value_to_string_lossy(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => serde_yaml::to_string(other)
            .unwrap_or_default()
            .trim()
            .to_string(),
    }
}

fn take_key(map: &mut Mapping, key: &str) -> Option<Value> {
    map.remove(&Value::String(key.to_string()))
}

/// Takes `key` out of `map` and tries to parse it with `parse`. If parsing
/// fails (e.g. an expression string like `${{ ... }}` where a bool or
/// integer was expected), the raw value is put back into `map` under `key`
/// so it round-trips through `extra` instead of being silently dropped
/// (spec.md §9: unknown/unrecognized values must be preserved verbatim).
fn take_or_preserve<T>(
    map: &mut Mapping,
    key: &str,
    parse: impl FnOnce(&Value) -> Option<T>,
) -> Option<T> {
    let value = take_key(map, key)?;
    match parse(&value) {
        Some(parsed) => Some(parsed),
        None => {
            map.insert(Value::String(key.to_string()), value);
            None
        }
    }
}

fn parse_needs(v: Value) -> Option<Needs> {
    match v {
        Value::String(s) => Some(Needs::One(s)),
        Value::Sequence(seq) => Some(Needs::Many(
            seq.iter().map(value_to_string_lossy).collect(),
        )),
        _ => None,
    }
}

fn needs_to_value(needs: &Needs) -> Value {
    match needs {
        Needs::One(s) => Value::String(s.clone()),
        Needs::Many(v) => Value::Sequence(v.iter().map(|s| Value::String(s.clone())).collect()),
    }
}

fn parse_u32(v: &Value) -> Option<u32> {
    match v {
        Value::Number(n) => n.as_u64().map(|n| n as u32),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn parse_bool(v: &Value) -> Option<bool> {
    match v {
        Value::Bool(b) => Some(*b),
        _ => None,
    }
}

fn parse_step(mut map: Mapping) -> Step {
    let name = take_key(&mut map, "name").map(|v| value_to_string_lossy(&v));
    let id = take_key(&mut map, "id").map(|v| value_to_string_lossy(&v));
    let run = take_key(&mut map, "run").map(|v| value_to_string_lossy(&v));
    let uses = take_key(&mut map, "uses").map(|v| value_to_string_lossy(&v));
    let timeout_minutes = take_or_preserve(&mut map, "timeout-minutes", parse_u32);
    let if_expr = take_key(&mut map, "if").map(|v| value_to_string_lossy(&v));
    Step {
        name,
        id,
        run,
        uses,
        timeout_minutes,
        if_expr,
        extra: map,
    }
}

fn parse_job(mut map: Mapping) -> Job {
    let name = take_key(&mut map, "name").map(|v| value_to_string_lossy(&v));
    let runs_on = take_key(&mut map, "runs-on");
    let needs = take_key(&mut map, "needs").and_then(parse_needs);
    let uses = take_key(&mut map, "uses").map(|v| value_to_string_lossy(&v));
    let timeout_minutes = take_or_preserve(&mut map, "timeout-minutes", parse_u32);
    let continue_on_error = take_or_preserve(&mut map, "continue-on-error", parse_bool);
    let if_expr = take_key(&mut map, "if").map(|v| value_to_string_lossy(&v));
    let steps = match take_key(&mut map, "steps") {
        Some(Value::Sequence(seq)) => seq
            .into_iter()
            .map(|v| match v {
                Value::Mapping(m) => parse_step(m),
                other => parse_step({
                    let mut m = Mapping::new();
                    m.insert(Value::String("run".to_string()), other);
                    m
                }),
            })
            .collect(),
        _ => Vec::new(),
    };

    Job {
        name,
        runs_on,
        steps,
        needs,
        uses,
        timeout_minutes,
        continue_on_error,
        if_expr,
        extra: map,
    }
}

impl WorkflowDocument {
    pub fn parse(file: &std::path::Path, source: &str) -> Result<Self, TransformError> {
        let value: Value =
            serde_yaml::from_str(source).map_err(|source| TransformError::Yaml {
                file: file.to_path_buf(),
                source,
            })?;
        let mut top = match value {
            Value::Mapping(m) => m,
            _ => {
                return Err(TransformError::NotAMapping {
                    file: file.to_path_buf(),
                });
            }
        };

        let jobs_value = take_key(&mut top, "jobs");
        let jobs_mapping = match jobs_value {
            Some(Value::Mapping(m)) => m,
            Some(_) => {
                return Err(TransformError::JobsNotAMapping {
                    file: file.to_path_buf(),
                });
            }
            None => Mapping::new(),
        };

        let mut jobs = IndexMap::new();
        for (key, value) in jobs_mapping {
            let id = value_to_string_lossy(&key);
            let job_map = match value {
                Value::Mapping(m) => m,
                _ => Mapping::new(),
            };
            jobs.insert(id, parse_job(job_map));
        }

        Ok(WorkflowDocument { extra: top, jobs })
    }

    fn step_to_value(step: &Step) -> Value {
        let mut map = Mapping::new();
        if let Some(ref name) = step.name {
            map.insert(Value::String("name".into()), Value::String(name.clone()));
        }
        if let Some(ref id) = step.id {
            map.insert(Value::String("id".into()), Value::String(id.clone()));
        }
        if let Some(ref if_expr) = step.if_expr {
            map.insert(Value::String("if".into()), Value::String(if_expr.clone()));
        }
        if let Some(ref uses) = step.uses {
            map.insert(Value::String("uses".into()), Value::String(uses.clone()));
        }
        if let Some(ref run) = step.run {
            map.insert(Value::String("run".into()), Value::String(run.clone()));
        }
        if let Some(tm) = step.timeout_minutes {
            map.insert(
                Value::String("timeout-minutes".into()),
                Value::Number(tm.into()),
            );
        }
        for (k, v) in &step.extra {
            map.insert(k.clone(), v.clone());
        }
        Value::Mapping(map)
    }

    fn job_to_value(id: &str, job: &Job) -> (Value, Value) {
        let mut map = Mapping::new();
        if let Some(ref name) = job.name {
            map.insert(Value::String("name".into()), Value::String(name.clone()));
        }
        if let Some(ref uses) = job.uses {
            map.insert(Value::String("uses".into()), Value::String(uses.clone()));
        }
        if let Some(ref needs) = job.needs {
            map.insert(Value::String("needs".into()), needs_to_value(needs));
        }
        if let Some(ref if_expr) = job.if_expr {
            map.insert(Value::String("if".into()), Value::String(if_expr.clone()));
        }
        if let Some(ref runs_on) = job.runs_on {
            map.insert(Value::String("runs-on".into()), runs_on.clone());
        }
        if let Some(tm) = job.timeout_minutes {
            map.insert(
                Value::String("timeout-minutes".into()),
                Value::Number(tm.into()),
            );
        }
        if let Some(coe) = job.continue_on_error {
            map.insert(Value::String("continue-on-error".into()), Value::Bool(coe));
        }
        for (k, v) in &job.extra {
            map.insert(k.clone(), v.clone());
        }
        if !job.steps.is_empty() {
            map.insert(
                Value::String("steps".into()),
                Value::Sequence(job.steps.iter().map(Self::step_to_value).collect()),
            );
        }
        (Value::String(id.to_string()), Value::Mapping(map))
    }

    /// Reconstructs the full document as a YAML value, applying any mutations
    /// made to `jobs` since parsing.
    pub fn to_value(&self) -> Value {
        let mut top = self.extra.clone();
        let mut jobs_map = Mapping::new();
        for (id, job) in &self.jobs {
            let (k, v) = Self::job_to_value(id, job);
            jobs_map.insert(k, v);
        }
        // `jobs` goes last so the common top-level keys (`name`, `on`, `env`,
        // `permissions`) read first, matching how these files are normally authored.
        top.insert(Value::String("jobs".into()), Value::Mapping(jobs_map));
        Value::Mapping(top)
    }

    /// Serializes with 2-space indent, no anchors (the model never introduces
    /// aliases), matching spec.md's serialization contract.
    pub fn serialize(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&self.to_value())
    }
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
