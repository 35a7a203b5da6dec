// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of GridCast.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! Caller-side guard for the group-key list handed to the pipeline.

use crate::error::{GridcastError, Result};
use gridcast_types::GroupKey;
use std::collections::HashSet;
use std::ops::Deref;

/// Non-empty, duplicate-free, ordered list of group keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupKeys(Vec<GroupKey>);

impl GroupKeys {
    /// Trim, drop blanks and duplicates (first occurrence wins), and require at least one key.
    pub fn new<I, S>(keys: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_limit(keys, usize::MAX)
    }

    /// Like [`GroupKeys::new`], keeping at most `limit` keys.
    pub fn with_limit<I, S>(keys: I, limit: usize) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let keys: Vec<GroupKey> = keys
            .into_iter()
            .filter_map(|k| {
                let k = k.as_ref().trim();
                (!k.is_empty() && seen.insert(k.to_owned())).then(|| GroupKey::new(k))
            })
            .take(limit)
            .collect();

        if keys.is_empty() {
            return Err(GridcastError::InvalidGroups(
                "at least one non-empty group key is required".to_owned(),
            ));
        }
        Ok(Self(keys))
    }

    pub fn as_slice(&self) -> &[GroupKey] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<GroupKey> {
        self.0
    }
}

impl Deref for GroupKeys {
    type Target = [GroupKey];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<[GroupKey]> for GroupKeys {
    fn as_ref(&self) -> &[GroupKey] {
        &self.0
    }
}
