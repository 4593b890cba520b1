use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Parameters file could not be used.
#[derive(Debug, Error)]
pub enum ParamsError {
    /// A probability lies outside `[0, 1]`.
    #[error("{name} must be a probability in [0, 1], got {value}")]
    NotAProbability {
        /// Field name.
        name: &'static str,
        /// Offending value.
        value: f64,
    },
    /// A magnitude or coefficient is negative or not finite.
    #[error("{name} must be finite and non-negative, got {value}")]
    Negative {
        /// Field name.
        name: &'static str,
        /// Offending value.
        value: f64,
    },
    /// File could not be read or written.
    #[error("parameters file: {0}")]
    Io(#[from] std::io::Error),
    /// File is not valid JSON for [`Params`].
    #[error("parameters JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Operator parameters for mutation, crossover and speciation distance.
///
/// Missing fields in a parameters file take their default value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Per-gene probability of perturbing the weight.
    pub perturb_chance: f64,
    /// Largest perturbation magnitude.
    pub perturb_amplitude: f64,
    /// Per-gene probability of replacing the weight with a fresh value.
    pub new_value_chance: f64,
    /// Per-mutation probability of splitting a connection with a new node.
    pub add_node_chance: f64,
    /// Per-mutation probability of trying to add a connection.
    pub add_connection_chance: f64,
    /// Node pairs tried before an add-connection mutation gives up.
    pub add_connection_attempts: usize,
    /// Probability that a gene disabled in either parent stays disabled in the offspring.
    pub disabled_chance: f64,
    /// Weight of excess genes in compatibility distance.
    pub excess_coefficient: f64,
    /// Weight of disjoint genes in compatibility distance.
    pub disjoint_coefficient: f64,
    /// Weight of mean matching-gene weight difference in compatibility distance.
    pub weight_coefficient: f64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            perturb_chance: 0.8,
            perturb_amplitude: 0.1,
            new_value_chance: 0.1,
            add_node_chance: 0.03,
            add_connection_chance: 0.05,
            add_connection_attempts: 20,
            disabled_chance: 0.75,
            excess_coefficient: 1.0,
            disjoint_coefficient: 1.0,
            weight_coefficient: 0.4,
        }
    }
}

impl Params {
    /// Checks that probabilities are in `[0, 1]` and magnitudes are non-negative.
    pub fn validate(&self) -> Result<(), ParamsError> {
        let probabilities = [
            ("perturb_chance", self.perturb_chance),
            ("new_value_chance", self.new_value_chance),
            ("add_node_chance", self.add_node_chance),
            ("add_connection_chance", self.add_connection_chance),
            ("disabled_chance", self.disabled_chance),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(ParamsError::NotAProbability { name, value });
            }
        }

        let magnitudes = [
            ("perturb_amplitude", self.perturb_amplitude),
            ("excess_coefficient", self.excess_coefficient),
            ("disjoint_coefficient", self.disjoint_coefficient),
            ("weight_coefficient", self.weight_coefficient),
        ];
        for (name, value) in magnitudes {
            if !value.is_finite() || value < 0.0 {
                return Err(ParamsError::Negative { name, value });
            }
        }
        Ok(())
    }

    /// Saves the parameters as pretty-printed JSON.
    pub fn save_to_file(&self, path: impl AsRef<std::path::Path>) -> Result<(), ParamsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Loads and validates parameters from a JSON file.
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ParamsError> {
        let json = std::fs::read_to_string(path)?;
        let params: Self = serde_json::from_str(&json)?;
        params.validate()?;
        Ok(params)
    }
}
