use crate::ast::{fmt_guid, Version};
use serde::Serializer;
use uuid::Uuid;

// GUIDs and versions serialize in the same spelling the `.sln` text uses, so JSON and
// YAML views can be compared against the source file by eye.

pub(crate) fn serialize_guid<S>(guid: &Uuid, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&fmt_guid(guid))
}

pub(crate) fn serialize_version<S>(version: &Version, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(version)
}
