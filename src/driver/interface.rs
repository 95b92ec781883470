//! Process-wide native interface handle.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::error::{AdapterError, SqlaResult};
use crate::native::NativeApi;

/// An initialized native driver interface.
///
/// Created once per process and shared by every session through an
/// `Arc`. The driver's global state does not survive `fork`; the process
/// manager must call [`Interface::after_fork`] in the child before any
/// session uses the handle.
pub struct Interface<A: NativeApi> {
    api: A,
    pid: AtomicU32,
}

impl<A: NativeApi> Interface<A> {
    /// Initialize the driver library.
    pub fn new(api: A) -> SqlaResult<Self> {
        if !api.init() {
            return Err(AdapterError::Interface(
                "the native driver interface could not be initialized".to_string(),
            ));
        }
        let pid = std::process::id();
        tracing::info!(pid, "native interface initialized");
        Ok(Self {
            api,
            pid: AtomicU32::new(pid),
        })
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Process that initialized the interface.
    pub fn owner_pid(&self) -> u32 {
        self.pid.load(Ordering::SeqCst)
    }

    /// True when the interface was initialized by another process.
    pub fn is_stale(&self) -> bool {
        self.owner_pid() != std::process::id()
    }

    /// Reinitialize the driver if this process is not the one that
    /// initialized it. Returns whether a reinitialization happened.
    pub fn after_fork(&self) -> SqlaResult<bool> {
        if !self.is_stale() {
            return Ok(false);
        }
        let pid = std::process::id();
        tracing::info!(parent = self.owner_pid(), pid, "reinitializing native interface after fork");
        self.api.fini();
        if !self.api.init() {
            return Err(AdapterError::Interface(format!(
                "the native driver interface could not be reinitialized in process {}",
                pid
            )));
        }
        self.pid.store(pid, Ordering::SeqCst);
        Ok(true)
    }
}

impl<A: NativeApi> Drop for Interface<A> {
    fn drop(&mut self) {
        // A forked child must not tear down the parent's driver state.
        if !self.is_stale() {
            self.api.fini();
        }
    }
}

impl<A: NativeApi> std::fmt::Debug for Interface<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interface").field("pid", &self.owner_pid()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::{BindParam, ColumnInfo, WireValue};
    use std::cell::Cell;

    #[derive(Default)]
    struct Lifecycle {
        init_ok: bool,
        inits: Cell<u32>,
        finis: Cell<u32>,
    }

    impl NativeApi for &Lifecycle {
        type Connection = ();
        type Statement = ();

        fn init(&self) -> bool {
            self.inits.set(self.inits.get() + 1);
            self.init_ok
        }
        fn fini(&self) {
            self.finis.set(self.finis.get() + 1);
        }
        fn new_connection(&self) -> Option<()> {
            None
        }
        fn connect(&self, _: &mut (), _: &str) -> bool {
            false
        }
        fn disconnect(&self, _: &mut ()) {}
        fn execute_immediate(&self, _: &mut (), _: &str) -> bool {
            false
        }
        fn prepare(&self, _: &mut (), _: &str) -> Option<()> {
            None
        }
        fn describe_bind_param(&self, _: &mut (), _: u32) -> Option<BindParam> {
            None
        }
        fn bind_param(&self, _: &mut (), _: u32, _: &BindParam) -> bool {
            false
        }
        fn execute(&self, _: &mut ()) -> bool {
            false
        }
        fn num_cols(&self, _: &()) -> i32 {
            -1
        }
        fn get_column_info(&self, _: &(), _: u32) -> Option<ColumnInfo> {
            None
        }
        fn fetch_next(&self, _: &mut ()) -> bool {
            false
        }
        fn get_column(&self, _: &(), _: u32) -> Option<WireValue> {
            None
        }
        fn affected_rows(&self, _: &()) -> i64 {
            -1
        }
        fn free_stmt(&self, _: ()) {}
        fn commit(&self, _: &mut ()) -> bool {
            false
        }
        fn rollback(&self, _: &mut ()) -> bool {
            false
        }
        fn error(&self, _: &()) -> (i32, String) {
            (0, String::new())
        }
    }

    #[test]
    fn test_init_failure_is_interface_error() {
        let lib = Lifecycle::default();
        let err = Interface::new(&lib).unwrap_err();
        assert!(matches!(err, AdapterError::Interface(_)));
    }

    #[test]
    fn test_fini_on_drop() {
        let lib = Lifecycle {
            init_ok: true,
            ..Default::default()
        };
        {
            let iface = Interface::new(&lib).unwrap();
            assert!(!iface.is_stale());
            assert!(!iface.after_fork().unwrap());
        }
        assert_eq!(lib.inits.get(), 1);
        assert_eq!(lib.finis.get(), 1);
    }

    #[test]
    fn test_stale_owner_is_reinitialized() {
        let lib = Lifecycle {
            init_ok: true,
            ..Default::default()
        };
        let iface = Interface {
            api: &lib,
            pid: AtomicU32::new(std::process::id().wrapping_add(1)),
        };
        assert!(iface.is_stale());
        assert!(iface.after_fork().unwrap());
        assert!(!iface.is_stale());
        assert_eq!(lib.inits.get(), 1);
        assert_eq!(lib.finis.get(), 1);
        drop(iface);
        assert_eq!(lib.finis.get(), 2);
    }
}
