//! # Personnel Roster
//!
//! The supervisors, evaluators and chainsaw operators that may be named on a
//! header. The roster is injected (usually from the app configuration);
//! [`Roster::default`] carries the crew list shipped with the app.

use crate::{PersonnelRole, ToconesError};
use serde::{Deserialize, Serialize};

const DEFAULT_SUPERVISORS: &[&str] = &[
    "Astudillo Pungo, Elkin Antonio",
    "Lopez Chandillo, Miguel Angel",
    "Orozco Ramírez, Juliana",
    "Hernandez, Erika",
    "Ramirez Ramirez, Grimaneza",
    "Tabares Tamayo, Jhon Edward",
];

const DEFAULT_CHAINSAW_OPERATORS: &[&str] = &[
    "Franco Franco, Ubeimar Ely",
    "Trejos Rendon, Ivan de Jesus",
    "Castañeda Vicente, Aldemar",
    "Hernadez Loaiza, Danover de Jesus",
    "Gutierrez Parra, Jairo de Jesus",
    "Jaramillo Ramirez, Rafael Andres",
    "Cruz Cardona, Cristian Danilo",
];

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| (*n).to_string()).collect()
}

/// Ordered name lists, one per personnel role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Roster {
    pub supervisors: Vec<String>,
    pub evaluators: Vec<String>,
    pub chainsaw_operators: Vec<String>,
}

impl Default for Roster {
    fn default() -> Self {
        Self {
            supervisors: owned(DEFAULT_SUPERVISORS),
            // The evaluator pool is the supervisor crew.
            evaluators: owned(DEFAULT_SUPERVISORS),
            chainsaw_operators: owned(DEFAULT_CHAINSAW_OPERATORS),
        }
    }
}

impl Roster {
    /// Names available for a role, in display order.
    #[must_use]
    pub fn names(&self, role: PersonnelRole) -> &[String] {
        match role {
            PersonnelRole::Supervisor => &self.supervisors,
            PersonnelRole::Evaluator => &self.evaluators,
            PersonnelRole::ChainsawOperator => &self.chainsaw_operators,
        }
    }

    /// Check whether a name is on the list for a role.
    #[must_use]
    pub fn contains(&self, role: PersonnelRole, name: &str) -> bool {
        self.names(role).iter().any(|n| n == name)
    }

    /// Ensure a name is on the list for a role.
    pub fn validate(&self, role: PersonnelRole, name: &str) -> Result<(), ToconesError> {
        if self.contains(role, name) {
            Ok(())
        } else {
            Err(ToconesError::UnknownPersonnel {
                role,
                name: name.to_string(),
            })
        }
    }

    /// Pick a name by its 1-based position in the role's list.
    #[must_use]
    pub fn pick(&self, role: PersonnelRole, position: usize) -> Option<&str> {
        position
            .checked_sub(1)
            .and_then(|i| self.names(role).get(i))
            .map(String::as_str)
    }
}
