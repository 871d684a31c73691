// Copyright 2025 Wordgrid Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Slot grids shared by the linear, CV and ONC transformers.

use crate::transformer::{Slot, SlotRole};
use serde::{Deserialize, Serialize};
use wordgrid_core::{FeatureResult, FeatureSet};

/// Side on which a short run or word is zero-padded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PadSide {
    /// Symbols start at the first slot
    #[default]
    Right,
    /// Symbols end at the last slot
    Left,
}

impl PadSide {
    /// First slot used when `used` of `capacity` slots are filled.
    pub fn start(&self, capacity: usize, used: usize) -> usize {
        match self {
            PadSide::Right => 0,
            PadSide::Left => capacity - used,
        }
    }
}

/// Frozen slot layout with precomputed column offsets.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    slots: Vec<Slot>,
    width: usize,
}

impl Grid {
    /// Lay out slots in order; typed slots take their class width, positions the
    /// reconciled width.
    pub fn build<I>(roles: I, features: &FeatureSet) -> Self
    where
        I: IntoIterator<Item = (SlotRole, Option<usize>)>,
    {
        let mut offset = 0;
        let slots: Vec<Slot> = roles
            .into_iter()
            .map(|(role, syllable)| {
                let width = match role.class() {
                    Some(class) => features.class_dim(class),
                    None => features.width(),
                };
                let slot = Slot {
                    role,
                    syllable,
                    offset,
                    width,
                };
                offset += width;
                slot
            })
            .collect();
        Self {
            slots,
            width: offset,
        }
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Total number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Write `symbol`'s vector into slot `index` of `row`.
    pub fn fill(
        &self,
        index: usize,
        symbol: &str,
        features: &FeatureSet,
        row: &mut [f32],
    ) -> FeatureResult<()> {
        let slot = &self.slots[index];
        let out = &mut row[slot.offset..slot.offset + slot.width];
        match slot.role.class() {
            Some(class) => out.copy_from_slice(features.vector_in(symbol, class)?),
            None => features.write_padded(symbol, out)?,
        }
        Ok(())
    }
}
