// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

use crate::chart::config::ChartConfig;
use crate::chart::types::ChartType;
use crate::error::{SerialisationError, SerialisationResult};
use chrono::{SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;

pub const EXPORT_VERSION_KEY: &str = "exportVersion";
pub const EXPORT_DATE_KEY: &str = "exportDate";
const TYPE_KEY: &str = "type";
/// Serialises `config` and stamps it with the export version and the
/// current UTC time.
pub fn export_value(config: &ChartConfig, version: &str) -> SerialisationResult<JsonValue> {
    let mut value = serde_json::to_value(config)?;
    let object = value
        .as_object_mut()
        .ok_or_else(|| SerialisationError::ExportError {
            reason: format!("'{}' config did not serialise to an object", config.chart_type()),
        })?;
    object.insert(EXPORT_VERSION_KEY.to_string(), JsonValue::from(version));
    object.insert(
        EXPORT_DATE_KEY.to_string(),
        JsonValue::from(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    Ok(value)
}
/// Shallow-merges `raw` over `defaults`. The `type` tag and export metadata
/// never reach the typed config; unknown keys land in its pass-through map.
pub fn import_value<C>(chart_type: ChartType, defaults: &C, raw: &JsonValue) -> SerialisationResult<C>
where
    C: Serialize + DeserializeOwned,
{
    let JsonValue::Object(patch) = raw else {
        return Err(SerialisationError::NotAnObject {
            chart_type,
            found: json_kind(raw).to_string(),
        });
    };
    let mut merged = match serde_json::to_value(defaults)? {
        JsonValue::Object(map) => map,
        other => {
            return Err(SerialisationError::ExportError {
                reason: format!("default '{chart_type}' config serialised to {}", json_kind(&other)),
            })
        }
    };
    for (key, value) in patch {
        if matches!(key.as_str(), TYPE_KEY | EXPORT_VERSION_KEY | EXPORT_DATE_KEY) {
            continue;
        }
        merged.insert(key.clone(), value.clone());
    }
    Ok(serde_json::from_value(JsonValue::Object(merged))?)
}
pub fn strip_export_metadata(value: &mut JsonValue) {
    if let Some(object) = value.as_object_mut() {
        object.remove(EXPORT_VERSION_KEY);
        object.remove(EXPORT_DATE_KEY);
    }
}
pub fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
