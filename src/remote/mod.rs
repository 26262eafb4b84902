//! Remote API boundary
//!
//! [`RemoteApi`] is the narrow interface to the simulator's remote calls.
//! Every call is blocking and hands back the raw integer status next to its
//! payload; interpreting the status is left to [`status`]. Transports live
//! outside this crate. [`MockRemote`] is an in-memory stand-in for tests.
//!
//! A session is stateful and not reentrant: one caller thread at a time.

pub mod mock;
pub mod status;

use serde::Serialize;
use std::fmt;

pub use mock::{MockRemote, RemoteCall};
pub use status::{check, decode, ErrorFlag, ErrorSet};

/// Session identifier handed out by [`RemoteApi::start`] (-1 = failed)
pub type ClientId = i32;

/// Raw status of a remote call (0 = success, otherwise an error bitmask)
pub type ReturnCode = i32;

/// Cartesian vector or Euler angles
pub type Vec3 = [f32; 3];

/// Integer object parameter holding a vision sensor's x-resolution
pub const PARAM_VISION_RESOLUTION_X: i32 = 1002;

/// Opaque handle to a scene object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ObjectHandle(pub i32);

impl ObjectHandle {
    /// Pseudo-handle for the world frame (absolute coordinates)
    pub const WORLD: ObjectHandle = ObjectHandle(-1);
}

impl fmt::Display for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Blocking remote calls of the simulator API
pub trait RemoteApi {
    /// Open a session; returns -1 when the server cannot be reached
    fn start(
        &self,
        host: &str,
        port: u16,
        wait_until_connected: bool,
        do_not_reconnect: bool,
        timeout_ms: i32,
        comm_cycle_ms: i32,
    ) -> ClientId;

    /// Close a session
    fn finish(&self, client: ClientId);

    fn get_object_handle(&self, client: ClientId, name: &str) -> (ReturnCode, ObjectHandle);

    fn get_object_int_parameter(
        &self,
        client: ClientId,
        handle: ObjectHandle,
        parameter: i32,
    ) -> (ReturnCode, i32);

    fn copy_paste_objects(
        &self,
        client: ClientId,
        handles: &[ObjectHandle],
    ) -> (ReturnCode, Vec<ObjectHandle>);

    fn get_object_position(
        &self,
        client: ClientId,
        handle: ObjectHandle,
        relative_to: ObjectHandle,
    ) -> (ReturnCode, Vec3);

    fn get_object_orientation(
        &self,
        client: ClientId,
        handle: ObjectHandle,
        relative_to: ObjectHandle,
    ) -> (ReturnCode, Vec3);

    /// Linear and angular velocity
    fn get_object_velocity(&self, client: ClientId, handle: ObjectHandle)
        -> (ReturnCode, Vec3, Vec3);

    fn set_object_position(
        &self,
        client: ClientId,
        handle: ObjectHandle,
        relative_to: ObjectHandle,
        position: Vec3,
    ) -> ReturnCode;

    fn set_object_orientation(
        &self,
        client: ClientId,
        handle: ObjectHandle,
        relative_to: ObjectHandle,
        euler: Vec3,
    ) -> ReturnCode;

    /// Resolution `[x, y]` and bottom-up row-major normalized samples
    fn get_vision_sensor_depth_buffer(
        &self,
        client: ClientId,
        handle: ObjectHandle,
    ) -> (ReturnCode, [i32; 2], Vec<f32>);

    fn create_dummy(&self, client: ClientId, size: f32) -> (ReturnCode, ObjectHandle);
}
