use std::collections::BTreeMap;

use serde::Deserialize;

use crate::models::Bundle;

#[derive(Debug, Deserialize)]
pub struct SetBundleRequest {
    pub key: String,
    pub items: BTreeMap<String, f64>,
}

impl From<SetBundleRequest> for Bundle {
    fn from(req: SetBundleRequest) -> Self {
        Bundle {
            key: req.key.trim().to_string(),
            items: req.items,
        }
    }
}
