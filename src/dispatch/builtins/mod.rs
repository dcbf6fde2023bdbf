//! Built-in operation table.
//!
//! Registered ahead of any extension so built-in tokens always win.

mod contexts;
mod entries;
mod info;
mod listing;
mod process;

use crate::dispatch::registry::Registry;

pub use contexts::{DeleteNamedContext, PrintStorePath, Switch};
pub use entries::{
    Clear, CopyKey, Del, Get, Import, NewEntry, Pop, Rename, Set, SetPath, Update,
};
pub use info::{Args, Help, Version};
pub use listing::{FullItems, Items, Keys, Log, Name, Now};
pub use process::{Exec, Shell};

pub fn register_all(registry: &mut Registry) {
    registry.register(Box::new(FullItems));
    registry.register(Box::new(Set));
    registry.register(Box::new(SetPath));
    registry.register(Box::new(Get));
    registry.register(Box::new(Pop));
    registry.register(Box::new(Del));
    registry.register(Box::new(Keys));
    registry.register(Box::new(Items));
    registry.register(Box::new(Rename));
    registry.register(Box::new(CopyKey));
    registry.register(Box::new(Switch));
    registry.register(Box::new(Name));
    registry.register(Box::new(Import));
    registry.register(Box::new(Update));
    registry.register(Box::new(Clear));
    registry.register(Box::new(NewEntry));
    registry.register(Box::new(Now));
    registry.register(Box::new(Log));
    registry.register(Box::new(Shell { dry_run: false }));
    registry.register(Box::new(Shell { dry_run: true }));
    registry.register(Box::new(Exec { dry_run: false }));
    registry.register(Box::new(Exec { dry_run: true }));
    registry.register(Box::new(Help));
    registry.register(Box::new(Version));
    registry.register(Box::new(Args));
    registry.register(Box::new(DeleteNamedContext));
    registry.register(Box::new(PrintStorePath));
}
