//! A scripted session against the person form.
//!
//! Each step plays what a user would do in the browser: type into an input
//! or press submit. After every step the form is redrawn from the edit
//! context once the bridge has applied its results.

use std::sync::Arc;

use editform::prelude::*;
use editform::wakeup::{self, WakeupReceiver};
use editform::UnhandledError;
use serde::Serialize;
use tokio::sync::mpsc;

use crate::models::{Address, Person};
use crate::validators::PersonValidator;

/// Errors that end the demo.
#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    #[error("form configuration failed: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to serialize summary: {0}")]
    Json(#[from] serde_json::Error),
}

/// One user action.
#[derive(Debug, Clone)]
enum Step {
    Submit,
    TypeName(&'static str),
    TypeStreet(&'static str),
    TypeCity(&'static str),
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::Submit => write!(f, "submit"),
            Step::TypeName(value) => write!(f, "type {:?} into Name", value),
            Step::TypeStreet(value) => write!(f, "type {:?} into Street", value),
            Step::TypeCity(value) => write!(f, "type {:?} into City", value),
        }
    }
}

const SCRIPT: &[Step] = &[
    Step::Submit,
    Step::TypeName("Al"),
    Step::TypeName("Alice"),
    Step::TypeStreet("Jl. Sudirman 1"),
    Step::TypeCity(""),
    Step::Submit,
    Step::TypeCity("Jakarta"),
    Step::Submit,
];

fn name_field() -> FieldIdentifier {
    FieldIdentifier::root("Name")
}

fn street_field() -> FieldIdentifier {
    FieldIdentifier::new("Address", "Street")
}

fn city_field() -> FieldIdentifier {
    FieldIdentifier::new("Address", "City")
}

#[derive(Debug, Serialize)]
struct FieldReport {
    field: String,
    messages: Vec<String>,
}

#[derive(Debug, Serialize)]
struct Summary {
    model: Person,
    valid: bool,
    fields: Vec<FieldReport>,
}

/// Run the scripted session and print a JSON summary of the final state.
pub async fn run(services: Arc<ServiceProvider>) -> Result<(), DemoError> {
    let cx = EditContext::new(Person {
        name: String::new(),
        address: Address {
            street: String::new(),
            city: "Jakarta".to_string(),
        },
    });

    let (wakeup_tx, mut wakeups) = wakeup::channel();
    cx.install_wakeup(wakeup_tx);

    let (error_tx, mut errors) = mpsc::unbounded_channel::<UnhandledError>();
    let bridge = FormValidationBridge::new(services, BridgeOptions::new().report_errors(error_tx));

    let params = BridgeParameters::new()
        .edit_context(&cx)
        .validator_type(TypeDescriptor::of::<PersonValidator>());
    bridge.set_parameters(params.clone())?;

    render(&cx);

    for step in SCRIPT {
        println!("\n> {}", step);
        apply(&cx, step);

        // The host re-renders the form on every pass; unchanged parameters
        // must not rebind.
        bridge.set_parameters(params.clone())?;
        bridge.settle().await;

        if redraw_pending(&mut wakeups) {
            render(&cx);
        }
        while let Ok(error) = errors.try_recv() {
            println!("  ! {}", error);
        }
    }

    bridge.dispose();

    let summary = Summary {
        model: (*cx.model()).clone(),
        valid: cx.is_valid(),
        fields: [name_field(), street_field(), city_field()]
            .into_iter()
            .map(|field| FieldReport {
                messages: cx.field_messages(&field),
                field: field.path(),
            })
            .collect(),
    };
    println!("\n{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn apply(cx: &EditContext<Person>, step: &Step) {
    match step {
        Step::Submit => cx.request_validation(),
        Step::TypeName(value) => cx.set_field(name_field(), |p| p.name = value.to_string()),
        Step::TypeStreet(value) => {
            cx.set_field(street_field(), |p| p.address.street = value.to_string())
        }
        Step::TypeCity(value) => cx.set_field(city_field(), |p| p.address.city = value.to_string()),
    }
}

fn redraw_pending(wakeups: &mut WakeupReceiver) -> bool {
    wakeups.drain() > 0
}

fn render(cx: &EditContext<Person>) {
    let model = cx.model();
    let inputs = [
        ("Name", name_field(), model.name.as_str()),
        ("Street", street_field(), model.address.street.as_str()),
        ("City", city_field(), model.address.city.as_str()),
    ];

    for (label, field, value) in inputs {
        let marker = if cx.is_field_modified(&field) { "*" } else { " " };
        println!("  {}{:<7} [{}]", marker, label, value);
        for message in cx.field_messages(&field) {
            println!("            - {}", message);
        }
    }
}
