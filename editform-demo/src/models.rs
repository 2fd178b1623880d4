use editform::Model;
use serde::Serialize;

/// A person filling in the demo form.
#[derive(Debug, Clone, Default, Serialize, Model)]
#[model(rename_all = "PascalCase")]
pub struct Person {
    pub name: String,
    #[model(nested)]
    pub address: Address,
}

#[derive(Debug, Clone, Default, Serialize, Model)]
#[model(rename_all = "PascalCase")]
pub struct Address {
    pub street: String,
    pub city: String,
}
