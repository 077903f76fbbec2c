// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connectors to the Home Assistant API.
//!
//! A [`Connector`] is the only component that talks to the network. Its
//! methods never return errors: transport failures and non-success statuses
//! are logged and turned into an empty value (`Vec::new()` or `None`), so
//! callers only ever see "got data" or "got nothing".
//!
//! # Connectors
//!
//! - [`RestConnector`]: the REST API over HTTP(S), with bearer-token auth

#[cfg(test)]
pub(crate) mod mock;
#[cfg(feature = "http")]
mod rest;

#[cfg(feature = "http")]
pub use rest::RestConnector;

use serde_json::Value;

use crate::types::{Attributes, DeviceCategory, RawEntity};

/// Default language for free-text conversation requests.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Transport over the Home Assistant API.
///
/// Every call is awaited to completion by its caller. Implementations apply a
/// per-request timeout and never retry.
#[allow(async_fn_in_trait)]
pub trait Connector {
    /// Fetches every entity. Returns an empty list on failure.
    async fn fetch_all(&self) -> Vec<RawEntity>;

    /// Fetches one entity by identifier.
    async fn fetch_one(&self, entity_id: &str) -> Option<RawEntity>;

    /// Writes an entity state and attributes.
    async fn write_state(
        &self,
        entity_id: &str,
        state: &str,
        attributes: Option<&Attributes>,
    ) -> Option<RawEntity>;

    /// Calls `<domain>.<service>` targeting one entity.
    ///
    /// `extra` fields are merged into the payload next to `entity_id`.
    async fn invoke_service(
        &self,
        domain: &str,
        service: &str,
        entity_id: &str,
        extra: Option<&Attributes>,
    ) -> Option<Value>;

    /// Sends free text to the conversation (Assist) endpoint.
    async fn send_freeform(&self, text: &str, language: &str) -> Option<Value>;

    /// Fetches every entity of one category.
    async fn fetch_by_category(&self, category: DeviceCategory) -> Vec<RawEntity> {
        let mut entities = self.fetch_all().await;
        entities.retain(|entity| entity.category() == Some(category));
        entities
    }

    /// Fetches the entities of one category whose attribute satisfies `matcher`.
    async fn fetch_where(
        &self,
        category: DeviceCategory,
        attribute: &str,
        matcher: &AttributeMatch,
    ) -> Vec<RawEntity> {
        let mut entities = self.fetch_by_category(category).await;
        entities.retain(|entity| matcher.matches(entity.attributes.get(attribute)));
        entities
    }
}

/// Predicate on a single attribute value.
///
/// A missing attribute never satisfies `Equals` or `In`, and always
/// satisfies `NotIn`.
///
/// # Examples
///
/// ```
/// use hass_voice::protocol::AttributeMatch;
/// use serde_json::json;
///
/// let matcher = AttributeMatch::In(vec![json!("kitchen"), json!("hall")]);
/// assert!(matcher.matches(Some(&json!("hall"))));
/// assert!(!matcher.matches(None));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeMatch {
    /// Attribute equals the value.
    Equals(Value),
    /// Attribute is one of the values.
    In(Vec<Value>),
    /// Attribute is none of the values.
    NotIn(Vec<Value>),
}

impl AttributeMatch {
    /// Evaluates the predicate.
    #[must_use]
    pub fn matches(&self, value: Option<&Value>) -> bool {
        match (self, value) {
            (Self::Equals(expected), Some(actual)) => expected == actual,
            (Self::In(values), Some(actual)) => values.contains(actual),
            (Self::NotIn(values), Some(actual)) => !values.contains(actual),
            (Self::NotIn(_), None) => true,
            (Self::Equals(_) | Self::In(_), None) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Fixed(Vec<RawEntity>);

    impl Connector for Fixed {
        async fn fetch_all(&self) -> Vec<RawEntity> {
            self.0.clone()
        }

        async fn fetch_one(&self, entity_id: &str) -> Option<RawEntity> {
            self.0.iter().find(|e| e.entity_id == entity_id).cloned()
        }

        async fn write_state(
            &self,
            _entity_id: &str,
            _state: &str,
            _attributes: Option<&Attributes>,
        ) -> Option<RawEntity> {
            None
        }

        async fn invoke_service(
            &self,
            _domain: &str,
            _service: &str,
            _entity_id: &str,
            _extra: Option<&Attributes>,
        ) -> Option<Value> {
            None
        }

        async fn send_freeform(&self, _text: &str, _language: &str) -> Option<Value> {
            None
        }
    }

    fn fixture() -> Fixed {
        Fixed(vec![
            RawEntity::new("light.kitchen").with_attribute("color_mode", "rgb"),
            RawEntity::new("light.hall").with_attribute("color_mode", "brightness"),
            RawEntity::new("light.porch"),
            RawEntity::new("lightning.strike").with_attribute("color_mode", "rgb"),
            RawEntity::new("switch.fan"),
        ])
    }

    fn ids(entities: &[RawEntity]) -> Vec<&str> {
        entities.iter().map(|e| e.entity_id.as_str()).collect()
    }

    #[test]
    fn attribute_match_rules() {
        let equals = AttributeMatch::Equals(json!(1));
        assert!(equals.matches(Some(&json!(1))));
        assert!(!equals.matches(Some(&json!("1"))));
        assert!(!equals.matches(None));

        let not_in = AttributeMatch::NotIn(vec![json!("a")]);
        assert!(not_in.matches(None));
        assert!(not_in.matches(Some(&json!("b"))));
        assert!(!not_in.matches(Some(&json!("a"))));
    }

    #[tokio::test]
    async fn fetch_by_category_uses_exact_domain() {
        let lights = fixture().fetch_by_category(DeviceCategory::Light).await;
        assert_eq!(ids(&lights), ["light.kitchen", "light.hall", "light.porch"]);
    }

    #[tokio::test]
    async fn fetch_where_filters_attributes() {
        let connector = fixture();

        let rgb = connector
            .fetch_where(
                DeviceCategory::Light,
                "color_mode",
                &AttributeMatch::Equals(json!("rgb")),
            )
            .await;
        assert_eq!(ids(&rgb), ["light.kitchen"]);

        let not_rgb = connector
            .fetch_where(
                DeviceCategory::Light,
                "color_mode",
                &AttributeMatch::NotIn(vec![json!("rgb")]),
            )
            .await;
        assert_eq!(ids(&not_rgb), ["light.hall", "light.porch"]);
    }
}
