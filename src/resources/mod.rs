//! BIG-IP resource structs and their CRUD operations on [`crate::BigIp`].
//!
//! Child collections are flat `Vec<T>` fields; [`reference`] wraps them into
//! the appliance's `<name>Reference` envelope on the wire.

pub mod asm;
pub mod gtm;
pub mod ltm;
pub mod net;
pub mod reference;

pub use asm::AsmPolicy;
pub use gtm::{Datacenter, GtmServer, GtmVirtualServer, RecordType, ServerAddress, WideIp, WideIpPool};
pub use ltm::{
    IRule, Monitor, Node, Pool, PoolMember, SourceAddressTranslation, VirtualServer,
    VirtualServerPolicy, VirtualServerProfile,
};
pub use net::{Route, SelfIp, Vlan, VlanInterface};
pub use reference::{Collection, ReferenceItems};
