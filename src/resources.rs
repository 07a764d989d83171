use std::collections::hash_map::Entry;
use std::collections::HashMap;

use declio::{Decode, Encode};
use derive_getters::Getters;

use crate::constants;
use crate::result::{Error, Result};
use crate::utils::JavaStr;

// Wire form of an instance-create record, minus the leading token byte.
#[derive(Debug, Encode, Decode)]
#[declio(ctx_is = "constants::ENDIANESS")]
pub(crate) struct InstanceRecord {
    pub id: i32,
    pub text_id: JavaStr,
    pub numeric_id: i64,
    pub type_id: i32,
}

/// A live instantiation of a [`ResourceType`](crate::schema::ResourceType),
/// alive from its create record until the matching delete record.
#[derive(Debug, Clone, Getters)]
pub struct ResourceInstance {
    id: i32,
    text_id: JavaStr,
    numeric_id: i64,
    type_id: i32,
    created_at_ms: i64,
}

impl ResourceInstance {
    pub(crate) fn from_record(record: InstanceRecord, created_at_ms: i64) -> Self {
        Self {
            id: record.id,
            text_id: record.text_id,
            numeric_id: record.numeric_id,
            type_id: record.type_id,
            created_at_ms,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct InstanceTable {
    instances: HashMap<i32, ResourceInstance>,
}

impl InstanceTable {
    pub fn insert(&mut self, instance: ResourceInstance) -> Result<()> {
        match self.instances.entry(*instance.id()) {
            Entry::Occupied(_) => Err(Error::BadInstance(*instance.id())),
            Entry::Vacant(slot) => {
                slot.insert(instance);
                Ok(())
            }
        }
    }

    pub fn remove(&mut self, id: i32) -> Result<ResourceInstance> {
        self.instances.remove(&id).ok_or(Error::UnknownInstance(id))
    }

    #[inline]
    pub fn get(&self, id: i32) -> Option<&ResourceInstance> {
        self.instances.get(&id)
    }
}
