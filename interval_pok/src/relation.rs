//! Descriptions of the relations a proof attests to.
//!
//! A statement is a vector of public objects `A_1..A_l`, a vector of hidden
//! exponents `w_1..w_r` (one per sphere), and a set of relations, each of
//! the form `Π A_{o}^{±w_v} = target` where the target is another public
//! object or the group identity.

use crate::error::IntervalPokError;
use serde::{Deserialize, Serialize};

/// One factor `A_object^{w_variable}` (or its inverse) of a relation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub object: usize,
    pub variable: usize,
    pub inverted: bool,
}

impl Term {
    pub fn new(object: usize, variable: usize) -> Self {
        Self {
            object,
            variable,
            inverted: false,
        }
    }

    pub fn inverted(object: usize, variable: usize) -> Self {
        Self {
            object,
            variable,
            inverted: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationTarget {
    /// The product of the terms is the group identity.
    One,
    /// The product of the terms is the object at this index.
    Object(usize),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub terms: Vec<Term>,
    pub target: RelationTarget,
}

impl Relation {
    pub fn new(terms: Vec<Term>, target: RelationTarget) -> Self {
        Self { terms, target }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationSet {
    pub relations: Vec<Relation>,
}

impl RelationSet {
    pub fn new(relations: Vec<Relation>) -> Self {
        Self { relations }
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    /// Checks every object and variable index against the statement
    /// dimensions.
    pub fn validate(
        &self,
        num_objects: usize,
        num_variables: usize,
    ) -> Result<(), IntervalPokError> {
        for relation in &self.relations {
            if let RelationTarget::Object(index) = relation.target {
                if index >= num_objects {
                    return Err(IntervalPokError::ObjectOutOfRange(index));
                }
            }
            for term in &relation.terms {
                if term.object >= num_objects {
                    return Err(IntervalPokError::ObjectOutOfRange(term.object));
                }
                if term.variable >= num_variables {
                    return Err(IntervalPokError::VariableOutOfRange(term.variable));
                }
            }
        }
        Ok(())
    }
}
