//! Login Flow Model
//!
//! This example drives a small web-login model: a login page, a
//! dashboard, a settings page and a logged-out page.
//!
//! Key concepts:
//! - States declared with `model_state!` and by hand
//! - Context-driven guards
//! - A custom policy with a prefilter and a selection strategy
//! - Targeted transitions with `make_transition_to`
//! - A driver that settles the system after each action
//!
//! Run with: RUST_LOG=debug cargo run --example login_flow

use ladon::core::{Context, LoadStrategy, ModelRef, State, StateDefinition, StateType};
use ladon::fsm::{FiniteStateMachine, FirstMatch, ModelError, ModelPolicy};
use ladon::transition::Transition;
use ladon::{model_state, Config, LogLevel};
use std::sync::Arc;
use std::time::Duration;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Login page; remembers which model drives it.
#[derive(Debug, Default)]
struct LoginPage {
    model: Option<ModelRef>,
}

impl State for LoginPage {
    fn type_name(&self) -> &'static str {
        Self::NAME
    }

    fn verify_as_current_state(&self) -> bool {
        self.model.is_some()
    }

    fn attach_model(&mut self, model: ModelRef) {
        self.model = Some(model);
    }
}

impl StateDefinition for LoginPage {
    const NAME: &'static str = "LoginPage";

    fn transitions() -> Vec<Transition> {
        vec![Transition::builder()
            .from::<LoginPage>()
            .to::<Dashboard>()
            .when_context(|ctx| ctx.get_str("password") == Some("hunter2"))
            .by(|_, ctx| {
                let user = ctx.get_str("user").ok_or("no user in context")?;
                println!("  submitting credentials for {user}");
                Ok(())
            })
            .build()
            .expect("login transition")]
    }
}

model_state! {
    /// Landing page after a successful login.
    struct Dashboard;
    transitions: vec![
        Transition::builder()
            .from::<Dashboard>()
            .to_name("LoggedOut")
            .by(|_, _| {
                println!("  clicking logout");
                Ok(())
            })
            .build()
            .expect("logout transition"),
        Transition::builder()
            .from::<Dashboard>()
            .to::<SettingsPage>()
            .build()
            .expect("settings transition"),
    ];
}

model_state! {
    struct SettingsPage;
    transitions: vec![Transition::builder()
        .from::<SettingsPage>()
        .to::<Dashboard>()
        .build()
        .expect("back transition")];
}

model_state! {
    struct LoggedOut;
    transitions: vec![Transition::builder()
        .from::<LoggedOut>()
        .to::<LoginPage>()
        .build()
        .expect("return transition")];
}

/// Explores the site without ever logging out on its own.
#[derive(Debug, Default)]
struct StayLoggedIn {
    selections: usize,
}

impl ModelPolicy for StayLoggedIn {
    fn passes_prefilter(&self, transition: &Transition) -> bool {
        transition.target_name() != LoggedOut::NAME
    }

    fn selection_strategy(&mut self, candidates: &[Arc<Transition>]) -> Result<usize, ModelError> {
        if candidates.is_empty() {
            return Err(ModelError::NoValidTransition);
        }
        self.selections += 1;
        Ok(0)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::new()
        .with_id("login-demo")
        .with_class_name("LoginFlow")
        .with_log_level(LogLevel::Info)
        .with_flag("browser", "headless")
        .with_settle_timeout(Duration::from_millis(500));

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from(config.log_level()).into())
        .from_env_lossy();
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!("=== Login Flow Model ===\n");
    println!("{config}\n");
    let mut fsm = FiniteStateMachine::new(config)
        .with_policy(StayLoggedIn::default())
        .with_driver(|max_wait: Duration| println!("  settling (up to {max_wait:?})"));

    fsm.graph_mut().declare(StateType::of::<LoggedOut>())?;
    fsm.use_state_type(StateType::of::<LoginPage>(), LoadStrategy::Connected)?;
    println!("Loaded states: {:?}\n", fsm.graph().loaded_state_types());

    println!("Wrong password:");
    let wrong = Context::new().with("user", "ada").with("password", "guess");
    match fsm.make_transition(LoadStrategy::Lazy, &wrong, None) {
        Err(err) => println!("  rejected: {err}\n"),
        Ok(state) => println!("  unexpectedly reached {}\n", state.type_name()),
    }

    println!("Right password:");
    let right = Context::new().with("user", "ada").with("password", "hunter2");
    let state = fsm.make_transition(LoadStrategy::Lazy, &right, None)?;
    println!("  now on {}\n", state.type_name());

    println!("Exploring (the policy never picks logout):");
    for _ in 0..2 {
        let state = fsm.make_transition(LoadStrategy::Lazy, &Context::new(), None)?;
        println!("  now on {}", state.type_name());
    }
    println!("  {} selections so far\n", fsm.policy().selections);

    println!("Targeted logout still goes through the policy's prefilter:");
    match fsm.make_transition_to(LoggedOut::NAME, LoadStrategy::Lazy, &Context::new(), None) {
        Err(err) => println!("  {err}\n"),
        Ok(state) => println!("  now on {}\n", state.type_name()),
    }

    let mut fsm = fsm.with_policy(FirstMatch);
    println!("Switching to first-match and logging out:");
    let state = fsm.make_transition_to(LoggedOut::NAME, LoadStrategy::Lazy, &Context::new(), None)?;
    println!("  now on {}\n", state.type_name());

    println!("=== Example Complete ===");
    Ok(())
}
