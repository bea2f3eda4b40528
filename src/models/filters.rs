//! Search filters and the raw query parameter normalizer.
//!
//! Query strings are loosely typed: any key may be missing, repeated or
//! garbled. [`RawParams`] captures them in one canonical shape and
//! [`SearchFilters::from_params`] turns them into a typed value. Nothing in
//! here fails; a value that cannot be understood leaves its dimension
//! unconstrained.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const PARAM_QUERY: &str = "q";
pub const PARAM_BUILDING: &str = "building";
pub const PARAM_TYPE: &str = "type";
pub const PARAM_MIN_CAPACITY: &str = "minCapacity";
pub const PARAM_MAX_CAPACITY: &str = "maxCapacity";
pub const PARAM_FLOOR: &str = "floor";
pub const PARAM_ACCESSIBLE: &str = "accessible";
pub const PARAM_FEATURES: &str = "features";

/// Value of one query parameter key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Single(String),
    Many(Vec<String>),
}

impl ParamValue {
    /// The value when the key appeared exactly once
    pub fn as_single(&self) -> Option<&str> {
        match self {
            ParamValue::Single(v) => Some(v),
            ParamValue::Many(_) => None,
        }
    }

    /// All values in arrival order
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            ParamValue::Single(v) => vec![v.clone()],
            ParamValue::Many(vs) => vs.clone(),
        }
    }
}

/// Decoded query parameters, keyed in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawParams {
    values: IndexMap<String, ParamValue>,
}

impl RawParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from decoded `(key, value)` pairs; repeated keys collect into
    /// [`ParamValue::Many`].
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut params = Self::new();
        for (key, value) in pairs {
            params.append(key, value);
        }
        params
    }

    /// Parse a raw URL query string. An undecodable string yields no params.
    pub fn parse(query: &str) -> Self {
        match serde_urlencoded::from_str::<Vec<(String, String)>>(query) {
            Ok(pairs) => Self::from_pairs(pairs),
            Err(e) => {
                tracing::debug!("Ignoring undecodable query string: {}", e);
                Self::new()
            }
        }
    }

    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(existing) = self.values.get_mut(&key) {
            let mut all = existing.to_vec();
            all.push(value);
            *existing = ParamValue::Many(all);
        } else {
            self.values.insert(key, ParamValue::Single(value));
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.values.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Typed, immutable room search constraints. `None` means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SearchFilters {
    pub building_id: Option<String>,
    pub room_type: Option<String>,
    pub min_capacity: Option<i32>,
    pub max_capacity: Option<i32>,
    pub floor: Option<i32>,
    /// Only ever `Some(true)`; absence never excludes rooms
    pub accessible: Option<bool>,
    pub feature_ids: Option<Vec<String>>,
    pub search_query: Option<String>,
}

/// Query parameters accepted by the room search endpoints (documentation only)
#[derive(Debug, IntoParams)]
#[into_params(parameter_in = Query)]
#[allow(dead_code)]
pub struct SearchParamsDoc {
    /// Case-insensitive match on room name or number
    pub q: Option<String>,
    /// Building id
    pub building: Option<String>,
    /// Room type code
    #[param(rename = "type")]
    pub room_type: Option<String>,
    #[param(rename = "minCapacity")]
    pub min_capacity: Option<i32>,
    #[param(rename = "maxCapacity")]
    pub max_capacity: Option<i32>,
    pub floor: Option<i32>,
    /// Only `true` narrows the result
    pub accessible: Option<String>,
    /// Feature ids, repeatable; rooms must carry all of them
    pub features: Option<Vec<String>>,
}

fn single(params: &RawParams, key: &str) -> Option<String> {
    params.get(key).and_then(ParamValue::as_single).map(str::to_string)
}

fn integer(params: &RawParams, key: &str) -> Option<i32> {
    params
        .get(key)
        .and_then(ParamValue::as_single)
        .and_then(leading_integer)
}

/// Leading integer of `raw`, like a browser's `parseInt`: `"10.5"` is 10,
/// `"12abc"` is 12. No digits, or overflow, gives `None`.
fn leading_integer(raw: &str) -> Option<i32> {
    let s = raw.trim_start();
    let sign_len = usize::from(s.starts_with(['+', '-']));
    let digits = s[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return None;
    }
    s[..sign_len + digits].parse().ok()
}

impl SearchFilters {
    /// Normalize raw query parameters. Never fails.
    pub fn from_params(params: &RawParams) -> Self {
        Self {
            building_id: single(params, PARAM_BUILDING),
            room_type: single(params, PARAM_TYPE),
            min_capacity: integer(params, PARAM_MIN_CAPACITY),
            max_capacity: integer(params, PARAM_MAX_CAPACITY),
            floor: integer(params, PARAM_FLOOR),
            accessible: params
                .get(PARAM_ACCESSIBLE)
                .and_then(ParamValue::as_single)
                .filter(|v| *v == "true")
                .map(|_| true),
            feature_ids: params.get(PARAM_FEATURES).map(ParamValue::to_vec),
            search_query: single(params, PARAM_QUERY),
        }
    }

    /// Serialize back to query parameter pairs, one `features` pair per id
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some(ref q) = self.search_query {
            pairs.push((PARAM_QUERY, q.clone()));
        }
        if let Some(ref building) = self.building_id {
            pairs.push((PARAM_BUILDING, building.clone()));
        }
        if let Some(ref room_type) = self.room_type {
            pairs.push((PARAM_TYPE, room_type.clone()));
        }
        if let Some(min) = self.min_capacity {
            pairs.push((PARAM_MIN_CAPACITY, min.to_string()));
        }
        if let Some(max) = self.max_capacity {
            pairs.push((PARAM_MAX_CAPACITY, max.to_string()));
        }
        if let Some(floor) = self.floor {
            pairs.push((PARAM_FLOOR, floor.to_string()));
        }
        if self.accessible == Some(true) {
            pairs.push((PARAM_ACCESSIBLE, "true".to_string()));
        }
        for id in self.feature_ids.iter().flatten() {
            pairs.push((PARAM_FEATURES, id.clone()));
        }

        pairs
    }

    /// URL-encoded form of [`Self::to_params`], without the leading `?`
    pub fn to_query_string(&self) -> String {
        serde_urlencoded::to_string(self.to_params()).unwrap_or_default()
    }

    /// Whether any dimension is constrained
    pub fn has_active_filters(&self) -> bool {
        self.search_query.is_some()
            || self.building_id.is_some()
            || self.room_type.is_some()
            || self.min_capacity.is_some()
            || self.max_capacity.is_some()
            || self.floor.is_some()
            || self.accessible == Some(true)
            || self.feature_ids.as_ref().is_some_and(|ids| !ids.is_empty())
    }
}
