//! JSON view of the command model.
//!
//! The snapshot is read-only: conversion functions are reported only as
//! `has-parser`, and opaque defaults serialize as `null`.

use serde::Serialize;

use crate::spec::{Command, Flag, FlagKind, Param};
use crate::value::Value;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ParamSchema {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub required: bool,
    pub has_parser: bool,
    #[serde(skip_serializing_if = "Value::is_none")]
    pub default: Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct FlagSchema {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub required: bool,
    pub kind: FlagKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub short: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub long: Vec<String>,
    pub has_parser: bool,
    #[serde(skip_serializing_if = "Value::is_none")]
    pub default: Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct CommandSchema {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub disable_name: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub short: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub long: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<ParamSchema>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<FlagSchema>,
}

impl ParamSchema {
    pub fn from_param(param: &Param) -> Self {
        Self {
            name: param.name().to_string(),
            description: param.description().map(str::to_string),
            required: param.is_required(),
            has_parser: param.value_parser().is_some(),
            default: param.default_value().clone(),
        }
    }
}

impl FlagSchema {
    pub fn from_flag(flag: &Flag) -> Self {
        Self {
            name: flag.name().to_string(),
            description: flag.description().map(str::to_string),
            required: flag.is_required(),
            kind: flag.kind(),
            short: flag.short_aliases().to_vec(),
            long: flag.long_aliases().to_vec(),
            has_parser: flag.value_parser().is_some(),
            default: flag.default_value().clone(),
        }
    }
}

impl CommandSchema {
    pub fn from_command(command: &Command) -> Self {
        Self {
            name: command.name().to_string(),
            description: command.description().map(str::to_string),
            disable_name: command.is_name_disabled(),
            short: command.short_aliases().to_vec(),
            long: command.long_aliases().to_vec(),
            params: command.params().iter().map(ParamSchema::from_param).collect(),
            flags: command.flags().iter().map(FlagSchema::from_flag).collect(),
        }
    }
}

/// Pretty-printed JSON array, one object per command.
pub fn to_json(commands: &[Command]) -> serde_json::Result<String> {
    let schemas: Vec<CommandSchema> = commands.iter().map(CommandSchema::from_command).collect();
    serde_json::to_string_pretty(&schemas)
}
