#[cfg(feature = "loom")]
mod imp {
    pub(crate) use loom::{
        sync::{Arc, Condvar, Mutex, MutexGuard},
        thread::JoinHandle,
    };

    pub(crate) fn spawn_worker(
        _name: String,
        f: impl FnOnce() + Send + 'static,
    ) -> JoinHandle<()> {
        loom::thread::spawn(f)
    }
}

#[cfg(not(feature = "loom"))]
mod imp {
    pub(crate) use std::{
        sync::{Arc, Condvar, Mutex, MutexGuard},
        thread::JoinHandle,
    };

    pub(crate) fn spawn_worker(
        name: String,
        f: impl FnOnce() + Send + 'static,
    ) -> JoinHandle<()> {
        std::thread::Builder::new()
            .name(name)
            .spawn(f)
            .expect("failed to spawn worker thread")
    }
}

pub(crate) use imp::*;
