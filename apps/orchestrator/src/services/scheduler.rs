// [apps/orchestrator/src/services/scheduler.rs]
/*!
 * =================================================================
 * APARATO: SKILL SCHEDULER (V1.0)
 * CLASIFICACIÓN: APPLICATION SERVICES (ESTRATO L1-APP)
 * RESPONSABILIDAD: REGISTRO EN MEMORIA DE TAREAS PROGRAMADAS/EVENTUALES
 *
 * A small in-memory registry, not a cron daemon: scheduled skills are
 * only actually invoked when something calls `run_due()` (the
 * orchestrator tick does this once per pass), and event skills fire
 * only when `dispatch_event` is called with a matching name. Failures
 * are caught and logged; they never propagate to the caller.
 * =================================================================
 */

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{error, info};

pub type SkillFuture = Pin<Box<dyn Future<Output = Result<(), String>> + Send>>;
pub type SkillExecute = Arc<dyn Fn() -> SkillFuture + Send + Sync>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkillTrigger {
    Schedule,
    Event,
    Request,
}

#[derive(Clone)]
pub struct SkillDescriptor {
    pub trigger: SkillTrigger,
    pub interval: Option<Duration>,
    pub events: Vec<String>,
    pub enabled: bool,
    pub execute: SkillExecute,
}

struct RegisteredSkill {
    descriptor: SkillDescriptor,
    last_run: Option<Instant>,
}

#[derive(Default)]
pub struct SkillScheduler {
    skills: Mutex<HashMap<String, RegisteredSkill>>,
}

impl SkillScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, name: impl Into<String>, descriptor: SkillDescriptor) {
        let mut skills = self.skills.lock().expect("skill scheduler mutex poisoned");
        skills.insert(name.into(), RegisteredSkill { descriptor, last_run: None });
    }

    pub fn set_enabled(&self, name: &str, enabled: bool) {
        if let Some(skill) = self.skills.lock().expect("skill scheduler mutex poisoned").get_mut(name) {
            skill.descriptor.enabled = enabled;
        }
    }

    /// Runs every enabled `Schedule` skill whose interval has elapsed
    /// since its last run. Call this once per orchestrator tick.
    pub async fn run_due(&self) {
        let due: Vec<(String, SkillExecute)> = {
            let mut skills = self.skills.lock().expect("skill scheduler mutex poisoned");
            let now = Instant::now();
            skills
                .iter_mut()
                .filter_map(|(name, skill)| {
                    if skill.descriptor.trigger != SkillTrigger::Schedule || !skill.descriptor.enabled {
                        return None;
                    }
                    let interval = skill.descriptor.interval?;
                    let elapsed_enough = skill.last_run.map(|at| now.duration_since(at) >= interval).unwrap_or(true);
                    if !elapsed_enough {
                        return None;
                    }
                    skill.last_run = Some(now);
                    Some((name.clone(), skill.descriptor.execute.clone()))
                })
                .collect()
        };

        for (name, execute) in due {
            run_one(&name, execute).await;
        }
    }

    /// Runs every enabled `Event` skill subscribed to `event_name`.
    pub async fn dispatch_event(&self, event_name: &str) {
        let matching: Vec<(String, SkillExecute)> = {
            let skills = self.skills.lock().expect("skill scheduler mutex poisoned");
            skills
                .iter()
                .filter(|(_, skill)| {
                    skill.descriptor.enabled
                        && skill.descriptor.trigger == SkillTrigger::Event
                        && skill.descriptor.events.iter().any(|e| e == event_name)
                })
                .map(|(name, skill)| (name.clone(), skill.descriptor.execute.clone()))
                .collect()
        };

        for (name, execute) in matching {
            run_one(&name, execute).await;
        }
    }
}

async fn run_one(name: &str, execute: SkillExecute) {
    match execute().await {
        Ok(()) => info!(skill = name, "✅ [SKILL_SCHEDULER]: skill completed"),
        Err(err) => error!(skill = name, error = %err, "❌ [SKILL_SCHEDULER]: skill failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn schedule_skill_does_not_fire_before_its_interval_elapses() {
        let scheduler = SkillScheduler::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_for_closure = calls.clone();

        scheduler.register(
            "probe",
            SkillDescriptor {
                trigger: SkillTrigger::Schedule,
                interval: Some(Duration::from_secs(3600)),
                events: Vec::new(),
                enabled: true,
                execute: Arc::new(move || {
                    let calls = calls_for_closure.clone();
                    Box::pin(async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Ok(())
                    })
                }),
            },
        );

        scheduler.run_due().await;
        scheduler.run_due().await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn disabled_skill_never_runs() {
        let scheduler = SkillScheduler::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_for_closure = calls.clone();

        scheduler.register(
            "probe",
            SkillDescriptor {
                trigger: SkillTrigger::Schedule,
                interval: Some(Duration::from_millis(1)),
                events: Vec::new(),
                enabled: false,
                execute: Arc::new(move || {
                    let calls = calls_for_closure.clone();
                    Box::pin(async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Ok(())
                    })
                }),
            },
        );

        scheduler.run_due().await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn event_skill_runs_only_on_matching_dispatch() {
        let scheduler = SkillScheduler::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_for_closure = calls.clone();

        scheduler.register(
            "on-breaker-open",
            SkillDescriptor {
                trigger: SkillTrigger::Event,
                interval: None,
                events: vec!["breaker.opened".to_string()],
                enabled: true,
                execute: Arc::new(move || {
                    let calls = calls_for_closure.clone();
                    Box::pin(async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Ok(())
                    })
                }),
            },
        );

        scheduler.dispatch_event("breaker.closed").await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        scheduler.dispatch_event("breaker.opened").await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
