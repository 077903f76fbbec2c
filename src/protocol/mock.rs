// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory connector recording every call, for unit tests.

use std::time::Duration;

use parking_lot::Mutex;
use serde_json::{Value, json};

use crate::protocol::Connector;
use crate::types::{Attributes, RawEntity};

/// One recorded service call.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ServiceCall {
    pub domain: String,
    pub service: String,
    pub entity_id: String,
    pub extra: Option<Attributes>,
}

#[derive(Debug, Default)]
pub(crate) struct MockConnector {
    entities: Mutex<Vec<RawEntity>>,
    calls: Mutex<Vec<ServiceCall>>,
    freeform: Mutex<Vec<(String, String)>>,
    fail_services: bool,
    fail_reads: bool,
    fetch_delay: Option<Duration>,
}

impl MockConnector {
    pub fn with_entities(entities: Vec<RawEntity>) -> Self {
        Self {
            entities: Mutex::new(entities),
            ..Self::default()
        }
    }

    pub fn failing_services(mut self) -> Self {
        self.fail_services = true;
        self
    }

    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    /// Makes `fetch_all` take this long, to widen rebuild windows.
    pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = Some(delay);
        self
    }

    pub fn set_entities(&self, entities: Vec<RawEntity>) {
        *self.entities.lock() = entities;
    }

    pub fn calls(&self) -> Vec<ServiceCall> {
        self.calls.lock().clone()
    }

    pub fn freeform(&self) -> Vec<(String, String)> {
        self.freeform.lock().clone()
    }
}

impl Connector for MockConnector {
    async fn fetch_all(&self) -> Vec<RawEntity> {
        if let Some(delay) = self.fetch_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_reads {
            return Vec::new();
        }
        self.entities.lock().clone()
    }

    async fn fetch_one(&self, entity_id: &str) -> Option<RawEntity> {
        if self.fail_reads {
            return None;
        }
        self.entities
            .lock()
            .iter()
            .find(|e| e.entity_id == entity_id)
            .cloned()
    }

    async fn write_state(
        &self,
        entity_id: &str,
        state: &str,
        attributes: Option<&Attributes>,
    ) -> Option<RawEntity> {
        if self.fail_services {
            return None;
        }
        let mut entity = RawEntity::new(entity_id).with_state(state);
        if let Some(attributes) = attributes {
            entity.attributes = attributes.clone();
        }
        Some(entity)
    }

    async fn invoke_service(
        &self,
        domain: &str,
        service: &str,
        entity_id: &str,
        extra: Option<&Attributes>,
    ) -> Option<Value> {
        self.calls.lock().push(ServiceCall {
            domain: domain.to_string(),
            service: service.to_string(),
            entity_id: entity_id.to_string(),
            extra: extra.cloned(),
        });
        if self.fail_services {
            None
        } else {
            Some(json!([]))
        }
    }

    async fn send_freeform(&self, text: &str, language: &str) -> Option<Value> {
        self.freeform
            .lock()
            .push((text.to_string(), language.to_string()));
        if self.fail_services {
            None
        } else {
            Some(json!({ "response": { "speech": { "plain": { "speech": "Done" } } } }))
        }
    }
}
