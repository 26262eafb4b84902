//! Scripted in-memory remote for testing
//!
//! Holds a tiny scene (named objects with pose, velocity and optional depth
//! buffer) and serves the [`RemoteApi`] calls from it. Failure codes can be
//! queued per call kind; queued codes are returned, in order, before the call
//! is served normally. Clones share state, so a test can keep a handle while
//! the client owns another.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{ClientId, ObjectHandle, RemoteApi, ReturnCode, Vec3, PARAM_VISION_RESOLUTION_X};

const SERVER_ERROR: ReturnCode = 8;

/// Remote call kinds, for scripting failures and counting calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteCall {
    Start,
    Finish,
    GetObjectHandle,
    GetObjectIntParameter,
    CopyPasteObjects,
    GetObjectPosition,
    GetObjectOrientation,
    GetObjectVelocity,
    SetObjectPosition,
    SetObjectOrientation,
    GetVisionSensorDepthBuffer,
    CreateDummy,
}

#[derive(Debug, Clone)]
struct MockObject {
    name: String,
    position: Vec3,
    orientation: Vec3,
    linear: Vec3,
    angular: Vec3,
    size: f32,
    depth: Option<([i32; 2], Vec<f32>)>,
}

impl MockObject {
    fn new(name: &str, position: Vec3) -> Self {
        Self {
            name: name.to_string(),
            position,
            orientation: [0.0; 3],
            linear: [0.0; 3],
            angular: [0.0; 3],
            size: 0.0,
            depth: None,
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    objects: HashMap<ObjectHandle, MockObject>,
    next_handle: i32,
    refuse_connections: bool,
    open_sessions: Vec<ClientId>,
    next_client: ClientId,
    failures: HashMap<RemoteCall, VecDeque<ReturnCode>>,
    calls: HashMap<RemoteCall, usize>,
}

impl MockState {
    /// Count the call and pop the next scripted failure, if any
    fn enter(&mut self, call: RemoteCall) -> Option<ReturnCode> {
        *self.calls.entry(call).or_insert(0) += 1;
        self.failures.get_mut(&call).and_then(VecDeque::pop_front)
    }

    fn insert(&mut self, object: MockObject) -> ObjectHandle {
        self.next_handle += 1;
        let handle = ObjectHandle(self.next_handle);
        self.objects.insert(handle, object);
        handle
    }

    /// Express `value` relative to another object's frame (translation only)
    fn relative(
        &self,
        value: Vec3,
        relative_to: ObjectHandle,
        pick: fn(&MockObject) -> Vec3,
    ) -> Option<Vec3> {
        if relative_to == ObjectHandle::WORLD {
            return Some(value);
        }
        let base = pick(self.objects.get(&relative_to)?);
        Some([value[0] - base[0], value[1] - base[1], value[2] - base[2]])
    }
}

/// In-memory [`RemoteApi`] implementation
#[derive(Debug, Clone, Default)]
pub struct MockRemote {
    state: Arc<Mutex<MockState>>,
}

impl MockRemote {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a plain object at `position`
    pub fn add_object(&self, name: &str, position: Vec3) -> ObjectHandle {
        self.state().insert(MockObject::new(name, position))
    }

    /// Add a vision sensor serving a fixed depth buffer (bottom-up rows)
    pub fn add_depth_sensor(
        &self,
        name: &str,
        resolution: [i32; 2],
        samples: Vec<f32>,
    ) -> ObjectHandle {
        let mut object = MockObject::new(name, [0.0; 3]);
        object.depth = Some((resolution, samples));
        self.state().insert(object)
    }

    pub fn set_velocity(&self, handle: ObjectHandle, linear: Vec3, angular: Vec3) {
        if let Some(object) = self.state().objects.get_mut(&handle) {
            object.linear = linear;
            object.angular = angular;
        }
    }

    /// Make every `start` fail
    pub fn refuse_connections(&self) {
        self.state().refuse_connections = true;
    }

    /// Queue return codes to hand out before serving `call` normally
    pub fn fail_next(&self, call: RemoteCall, codes: &[ReturnCode]) {
        self.state()
            .failures
            .entry(call)
            .or_default()
            .extend(codes.iter().copied());
    }

    /// Number of times `call` was issued
    pub fn calls(&self, call: RemoteCall) -> usize {
        self.state().calls.get(&call).copied().unwrap_or(0)
    }

    pub fn position_of(&self, handle: ObjectHandle) -> Option<Vec3> {
        self.state().objects.get(&handle).map(|o| o.position)
    }

    pub fn orientation_of(&self, handle: ObjectHandle) -> Option<Vec3> {
        self.state().objects.get(&handle).map(|o| o.orientation)
    }

    pub fn size_of(&self, handle: ObjectHandle) -> Option<f32> {
        self.state().objects.get(&handle).map(|o| o.size)
    }

    pub fn object_count(&self) -> usize {
        self.state().objects.len()
    }

    /// Sessions started and not yet finished
    pub fn open_sessions(&self) -> usize {
        self.state().open_sessions.len()
    }
}

impl RemoteApi for MockRemote {
    fn start(
        &self,
        _host: &str,
        _port: u16,
        _wait_until_connected: bool,
        _do_not_reconnect: bool,
        _timeout_ms: i32,
        _comm_cycle_ms: i32,
    ) -> ClientId {
        let mut state = self.state();
        if state.enter(RemoteCall::Start).is_some() || state.refuse_connections {
            return -1;
        }
        let id = state.next_client;
        state.next_client += 1;
        state.open_sessions.push(id);
        id
    }

    fn finish(&self, client: ClientId) {
        let mut state = self.state();
        state.enter(RemoteCall::Finish);
        state.open_sessions.retain(|&id| id != client);
    }

    fn get_object_handle(&self, _client: ClientId, name: &str) -> (ReturnCode, ObjectHandle) {
        let mut state = self.state();
        if let Some(code) = state.enter(RemoteCall::GetObjectHandle) {
            return (code, ObjectHandle(0));
        }
        state
            .objects
            .iter()
            .find(|(_, o)| o.name == name)
            .map(|(&handle, _)| (0, handle))
            .unwrap_or((SERVER_ERROR, ObjectHandle(0)))
    }

    fn get_object_int_parameter(
        &self,
        _client: ClientId,
        handle: ObjectHandle,
        parameter: i32,
    ) -> (ReturnCode, i32) {
        let mut state = self.state();
        if let Some(code) = state.enter(RemoteCall::GetObjectIntParameter) {
            return (code, 0);
        }
        match state.objects.get(&handle).and_then(|o| o.depth.as_ref()) {
            Some((resolution, _)) if parameter == PARAM_VISION_RESOLUTION_X => (0, resolution[0]),
            _ => (SERVER_ERROR, 0),
        }
    }

    fn copy_paste_objects(
        &self,
        _client: ClientId,
        handles: &[ObjectHandle],
    ) -> (ReturnCode, Vec<ObjectHandle>) {
        let mut state = self.state();
        if let Some(code) = state.enter(RemoteCall::CopyPasteObjects) {
            return (code, Vec::new());
        }
        let originals: Option<Vec<MockObject>> =
            handles.iter().map(|h| state.objects.get(h).cloned()).collect();
        match originals {
            Some(originals) => (0, originals.into_iter().map(|o| state.insert(o)).collect()),
            None => (SERVER_ERROR, Vec::new()),
        }
    }

    fn get_object_position(
        &self,
        _client: ClientId,
        handle: ObjectHandle,
        relative_to: ObjectHandle,
    ) -> (ReturnCode, Vec3) {
        let mut state = self.state();
        if let Some(code) = state.enter(RemoteCall::GetObjectPosition) {
            return (code, [0.0; 3]);
        }
        state
            .objects
            .get(&handle)
            .and_then(|o| state.relative(o.position, relative_to, |b| b.position))
            .map(|p| (0, p))
            .unwrap_or((SERVER_ERROR, [0.0; 3]))
    }

    fn get_object_orientation(
        &self,
        _client: ClientId,
        handle: ObjectHandle,
        relative_to: ObjectHandle,
    ) -> (ReturnCode, Vec3) {
        let mut state = self.state();
        if let Some(code) = state.enter(RemoteCall::GetObjectOrientation) {
            return (code, [0.0; 3]);
        }
        state
            .objects
            .get(&handle)
            .and_then(|o| state.relative(o.orientation, relative_to, |b| b.orientation))
            .map(|e| (0, e))
            .unwrap_or((SERVER_ERROR, [0.0; 3]))
    }

    fn get_object_velocity(
        &self,
        _client: ClientId,
        handle: ObjectHandle,
    ) -> (ReturnCode, Vec3, Vec3) {
        let mut state = self.state();
        if let Some(code) = state.enter(RemoteCall::GetObjectVelocity) {
            return (code, [0.0; 3], [0.0; 3]);
        }
        match state.objects.get(&handle) {
            Some(o) => (0, o.linear, o.angular),
            None => (SERVER_ERROR, [0.0; 3], [0.0; 3]),
        }
    }

    fn set_object_position(
        &self,
        _client: ClientId,
        handle: ObjectHandle,
        relative_to: ObjectHandle,
        position: Vec3,
    ) -> ReturnCode {
        let mut state = self.state();
        if let Some(code) = state.enter(RemoteCall::SetObjectPosition) {
            return code;
        }
        let base = if relative_to == ObjectHandle::WORLD {
            Some([0.0; 3])
        } else {
            state.objects.get(&relative_to).map(|o| o.position)
        };
        match (base, state.objects.get_mut(&handle)) {
            (Some(base), Some(object)) => {
                object.position = [
                    base[0] + position[0],
                    base[1] + position[1],
                    base[2] + position[2],
                ];
                0
            }
            _ => SERVER_ERROR,
        }
    }

    fn set_object_orientation(
        &self,
        _client: ClientId,
        handle: ObjectHandle,
        relative_to: ObjectHandle,
        euler: Vec3,
    ) -> ReturnCode {
        let mut state = self.state();
        if let Some(code) = state.enter(RemoteCall::SetObjectOrientation) {
            return code;
        }
        if relative_to != ObjectHandle::WORLD {
            return SERVER_ERROR;
        }
        match state.objects.get_mut(&handle) {
            Some(object) => {
                object.orientation = euler;
                0
            }
            None => SERVER_ERROR,
        }
    }

    fn get_vision_sensor_depth_buffer(
        &self,
        _client: ClientId,
        handle: ObjectHandle,
    ) -> (ReturnCode, [i32; 2], Vec<f32>) {
        let mut state = self.state();
        if let Some(code) = state.enter(RemoteCall::GetVisionSensorDepthBuffer) {
            return (code, [0, 0], Vec::new());
        }
        match state.objects.get(&handle).and_then(|o| o.depth.clone()) {
            Some((resolution, samples)) => (0, resolution, samples),
            None => (SERVER_ERROR, [0, 0], Vec::new()),
        }
    }

    fn create_dummy(&self, _client: ClientId, size: f32) -> (ReturnCode, ObjectHandle) {
        let mut state = self.state();
        if let Some(code) = state.enter(RemoteCall::CreateDummy) {
            return (code, ObjectHandle(0));
        }
        let name = format!("Dummy{}", state.next_handle + 1);
        let mut dummy = MockObject::new(&name, [0.0; 3]);
        dummy.size = size;
        (0, state.insert(dummy))
    }
}
