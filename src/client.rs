//! Simulator session
//!
//! [`SimClient`] owns one remote session: it opens it, resolves object names
//! to handles, and closes it again on [`SimClient::close`] or drop. Scene
//! objects borrow the client, so they cannot outlive the session.

use simlink_core_resilience::RetryPolicy;
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::error::{Result, SimError};
use crate::object::{ObjectKind, SimObject};
use crate::remote::{
    check, ClientId, ObjectHandle, RemoteApi, Vec3, PARAM_VISION_RESOLUTION_X,
};

/// Default edge length of a dummy created by [`SimClient::create_dummy`]
pub const DEFAULT_DUMMY_SIZE: f32 = 0.2;

/// Open session against a simulator
#[derive(Debug)]
pub struct SimClient<R: RemoteApi> {
    api: R,
    id: ClientId,
    policy: RetryPolicy,
    depth_resize: Option<[u32; 2]>,
    closed: bool,
}

impl<R: RemoteApi> SimClient<R> {
    /// Open a session to `config.host:config.port`
    ///
    /// A refused connection is reported as [`SimError::Connection`] and is not
    /// retried here.
    pub fn connect(api: R, config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let id = api.start(
            &config.host,
            config.port,
            config.wait_until_connected,
            config.do_not_reconnect,
            config.timeout_ms,
            config.comm_cycle_ms,
        );
        if id == -1 {
            return Err(SimError::Connection(format!(
                "Connection to {}:{} failed",
                config.host, config.port
            )));
        }

        info!(host = %config.host, port = config.port, client = id, "connected to simulator");

        Ok(Self {
            api,
            id,
            policy: config.retry_policy(),
            depth_resize: config.depth_resize,
            closed: false,
        })
    }

    pub fn id(&self) -> ClientId {
        self.id
    }

    pub fn api(&self) -> &R {
        &self.api
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.policy
    }

    pub(crate) fn depth_resize(&self) -> Option<[u32; 2]> {
        self.depth_resize
    }

    /// Run a remote operation under this session's retry policy
    pub(crate) fn retry<T, F>(&self, operation: &str, op: F) -> Result<T>
    where
        F: FnMut() -> Result<T>,
    {
        self.policy.execute(operation, op)
    }

    /// Resolve a named scene object
    ///
    /// Vision sensors are told apart by probing their x-resolution parameter:
    /// only a sensor answers it without error.
    pub fn get_object(&self, name: &str) -> Result<SimObject<'_, R>> {
        let (ret, handle) = self.api.get_object_handle(self.id, name);
        check(ret)?;

        let (ret, _) =
            self.api
                .get_object_int_parameter(self.id, handle, PARAM_VISION_RESOLUTION_X);
        let kind = if ret == 0 {
            ObjectKind::DepthSensor
        } else {
            ObjectKind::Plain
        };

        debug!(name, %handle, ?kind, "resolved object");
        Ok(SimObject::new(self, handle, name, kind))
    }

    /// Create a dummy object at an absolute position
    pub fn create_dummy(&self, position: Vec3, size: f32) -> Result<SimObject<'_, R>> {
        if !(size.is_finite() && size > 0.0) {
            return Err(SimError::InvalidArgument(format!(
                "dummy size must be positive, got {}",
                size
            )));
        }

        let (ret, handle) = self.api.create_dummy(self.id, size);
        check(ret)?;

        let ret = self
            .api
            .set_object_position(self.id, handle, ObjectHandle::WORLD, position);
        check(ret)?;

        let name = format!("dummy{}", handle.0);
        debug!(%handle, ?position, size, "created dummy");
        Ok(SimObject::new(self, handle, &name, ObjectKind::Dummy))
    }

    /// Close the session
    pub fn close(mut self) {
        self.finish();
    }

    fn finish(&mut self) {
        if !self.closed {
            self.api.finish(self.id);
            self.closed = true;
            info!(client = self.id, "closed simulator session");
        }
    }
}

impl<R: RemoteApi> Drop for SimClient<R> {
    fn drop(&mut self) {
        self.finish();
    }
}
