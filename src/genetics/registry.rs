//! Tagged (de)serialization registry.
//!
//! Every persisted value travels as a [`Record`]: a stable type tag next to
//! its JSON field data. A [`Registry`] maps tags to decode functions, so a
//! storage layer can restore values without knowing their concrete types.

use std::any::Any;
use std::collections::HashMap;
use std::path::Path;

use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::genome::{Genome, GenomeData, GenomeError};

/// Errors raised while encoding or decoding records.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No decoder is registered under the record's tag.
    #[error("no type registered under tag `{0}`")]
    UnknownTag(String),
    /// The record was asked to decode as a different type.
    #[error("expected a `{expected}` record, found `{found}`")]
    TagMismatch {
        /// Tag of the requested type.
        expected: &'static str,
        /// Tag carried by the record.
        found: String,
    },
    /// The decoded genome breaks an invariant.
    #[error("invalid genome: {0}")]
    InvalidGenome(#[from] GenomeError),
    /// Serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// File could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A type that can be stored under a stable tag.
pub trait Persistent: Serialize + DeserializeOwned + Any {
    /// Tag written alongside the field data. Never change it once data exists.
    const TAG: &'static str;

    /// Decodes the field data of a record.
    fn decode(data: Value) -> Result<Self, RegistryError> {
        Ok(serde_json::from_value(data)?)
    }
}

impl Persistent for Genome {
    const TAG: &'static str = "strand";

    /// Keeps invariant violations apart from malformed JSON.
    fn decode(data: Value) -> Result<Self, RegistryError> {
        let data: GenomeData = serde_json::from_value(data)?;
        Ok(Genome::try_from(data)?)
    }
}

/// A tagged value ready for storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Type tag.
    #[serde(rename = "type")]
    pub tag: String,
    /// Field data.
    pub data: Value,
}

impl Record {
    /// Encodes a value together with its tag.
    pub fn encode<T: Persistent>(value: &T) -> Result<Self, RegistryError> {
        Ok(Self {
            tag: T::TAG.to_owned(),
            data: serde_json::to_value(value)?,
        })
    }
}

type Decoder = fn(Value) -> Result<Box<dyn Any>, RegistryError>;

fn decode_boxed<T: Persistent>(data: Value) -> Result<Box<dyn Any>, RegistryError> {
    Ok(Box::new(T::decode(data)?))
}

/// Table of decode functions keyed by type tag.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    decoders: HashMap<String, Decoder>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry that knows [`Genome`].
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register::<Genome>();
        registry
    }

    /// Registers `T` under [`Persistent::TAG`], replacing any previous entry.
    pub fn register<T: Persistent>(&mut self) -> &mut Self {
        self.decoders.insert(T::TAG.to_owned(), decode_boxed::<T>);
        self
    }

    /// Whether a decoder exists for `tag`.
    pub fn contains(&self, tag: &str) -> bool {
        self.decoders.contains_key(tag)
    }

    /// Decodes a record into whatever type its tag names.
    pub fn decode(&self, record: Record) -> Result<Box<dyn Any>, RegistryError> {
        let Some(decoder) = self.decoders.get(&record.tag) else {
            warn!("cannot decode record with unknown tag `{}`", record.tag);
            return Err(RegistryError::UnknownTag(record.tag));
        };
        decoder(record.data)
    }

    /// Decodes a record that must hold a `T`.
    pub fn decode_as<T: Persistent>(&self, record: Record) -> Result<T, RegistryError> {
        if record.tag != T::TAG {
            return Err(RegistryError::TagMismatch {
                expected: T::TAG,
                found: record.tag,
            });
        }
        let found = record.tag.clone();
        self.decode(record)?
            .downcast::<T>()
            .map(|value| *value)
            .map_err(|_| RegistryError::TagMismatch {
                expected: T::TAG,
                found,
            })
    }

    /// Serializes a value as a pretty-printed tagged JSON record.
    pub fn encode_json<T: Persistent>(&self, value: &T) -> Result<String, RegistryError> {
        if !self.contains(T::TAG) {
            return Err(RegistryError::UnknownTag(T::TAG.to_owned()));
        }
        Ok(serde_json::to_string_pretty(&Record::encode(value)?)?)
    }

    /// Decodes a tagged JSON record.
    pub fn decode_json(&self, json: &str) -> Result<Box<dyn Any>, RegistryError> {
        let record: Record = serde_json::from_str(json)?;
        self.decode(record)
    }

    /// Decodes a tagged JSON record that must hold a `T`.
    pub fn decode_json_as<T: Persistent>(&self, json: &str) -> Result<T, RegistryError> {
        let record: Record = serde_json::from_str(json)?;
        self.decode_as(record)
    }

    /// Saves a value to a JSON file.
    pub fn save_to_file<T: Persistent>(
        &self,
        path: impl AsRef<Path>,
        value: &T,
    ) -> Result<(), RegistryError> {
        let json = self.encode_json(value)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Loads a `T` from a JSON file.
    pub fn load_from_file<T: Persistent>(&self, path: impl AsRef<Path>) -> Result<T, RegistryError> {
        let json = std::fs::read_to_string(path)?;
        self.decode_json_as(&json)
    }
}
