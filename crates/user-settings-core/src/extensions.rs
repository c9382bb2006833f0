//! State registered by feature crates at start
//!
//! Each feature crate adds its own shared state (validators, caches) once,
//! while the app is being built. An entry is looked up by its type and can
//! not be replaced after registration.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;

use crate::prelude::*;

type Entry = Box<dyn Any + Send + Sync>;

#[derive(Default)]
pub struct Extensions(HashMap<TypeId, (&'static str, Entry)>);

impl Extensions {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `val`, failing if a value of the same type is already present
	pub fn register<T: Send + Sync + 'static>(&mut self, val: T) -> AppResult<()> {
		let name = type_name::<T>();
		if self.0.contains_key(&TypeId::of::<T>()) {
			error!("Extension {} registered twice", name);
			return Err(Error::ConfigError(format!("Extension {} registered twice", name)));
		}
		debug!("Registered extension {}", name);
		self.0.insert(TypeId::of::<T>(), (name, Box::new(val)));
		Ok(())
	}

	pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
		self.0.get(&TypeId::of::<T>()).and_then(|(_, val)| val.downcast_ref::<T>())
	}

	/// Type names of the registered values, for start-up logging
	pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
		self.0.values().map(|(name, _)| *name)
	}
}


// vim: ts=4
