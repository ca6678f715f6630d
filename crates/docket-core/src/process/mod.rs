//! Whole-registry passes run by the aggregator after grouping.

mod accessors;
mod defaults;
mod enums;
mod ext4_events;
mod fires;
mod inherit_doc;
mod overrides;
mod return_values;

pub(crate) use accessors::add_accessors;
pub(crate) use defaults::fill_default_types;
pub(crate) use enums::process_enums;
pub(crate) use ext4_events::{add_event_options, enabled as ext4_events_enabled};
pub(crate) use fires::process_fires;
pub(crate) use inherit_doc::inherit_docs;
pub(crate) use overrides::absorb_overrides;
pub(crate) use return_values::process_returns;
