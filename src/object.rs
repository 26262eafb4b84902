//! Scene objects
//!
//! Every getter and setter here forwards to one remote call, turns its return
//! code into a [`Result`] and runs under the session's retry policy, so a
//! decoded remote error is logged and the call re-issued until it succeeds.

use std::fmt;

use simlink_core_depth::{dilate, from_sensor, resize, DepthImage};

use crate::client::SimClient;
use crate::error::{Result, SimError};
use crate::remote::{check, ObjectHandle, RemoteApi, Vec3};

/// What a resolved object turned out to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// Any scene object
    Plain,
    /// Vision sensor that serves depth buffers
    DepthSensor,
    /// Dummy created through the client
    Dummy,
}

/// Position in spherical coordinates
///
/// Azimuth is counter-clockwise from +X: 0 front, 90 left, ±180 back, -90
/// right. Elevation is measured from the XY plane: 0 horizon, 90 zenith,
/// -90 nadir.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    pub distance: f32,
    pub azimuth_deg: f32,
    pub elevation_deg: f32,
}

impl Spherical {
    /// Convert a cartesian offset; the origin maps to zero elevation
    pub fn from_cartesian(p: Vec3) -> Self {
        let distance = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
        let azimuth_deg = p[1].atan2(p[0]).to_degrees();
        let elevation_deg = if distance > 0.0 {
            (p[2] / distance).clamp(-1.0, 1.0).asin().to_degrees()
        } else {
            0.0
        };
        Self {
            distance,
            azimuth_deg,
            elevation_deg,
        }
    }
}

/// One depth buffer fetch
#[derive(Debug, Clone, PartialEq)]
pub struct DepthFrame {
    /// Native sensor resolution `(width, height)`
    pub resolution: (u32, u32),
    /// Upright normalized depth, resized when the client is configured to
    pub image: DepthImage,
}

/// Handle to a scene object within a session
pub struct SimObject<'c, R: RemoteApi> {
    client: &'c SimClient<R>,
    handle: ObjectHandle,
    name: String,
    kind: ObjectKind,
}

impl<R: RemoteApi> fmt::Debug for SimObject<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimObject")
            .field("handle", &self.handle)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

fn frame_of<R: RemoteApi>(other: Option<&SimObject<'_, R>>) -> ObjectHandle {
    other.map_or(ObjectHandle::WORLD, |o| o.handle)
}

impl<'c, R: RemoteApi> SimObject<'c, R> {
    pub(crate) fn new(
        client: &'c SimClient<R>,
        handle: ObjectHandle,
        name: &str,
        kind: ObjectKind,
    ) -> Self {
        Self {
            client,
            handle,
            name: name.to_string(),
            kind,
        }
    }

    pub fn handle(&self) -> ObjectHandle {
        self.handle
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    fn op(&self, call: &str) -> String {
        format!("{}({})", call, self.name)
    }

    /// Copy-paste this object; returns the handles of the copies
    pub fn duplicate(&self) -> Result<Vec<ObjectHandle>> {
        let client = self.client;
        client.retry(&self.op("duplicate"), || {
            let (ret, handles) = client.api().copy_paste_objects(client.id(), &[self.handle]);
            check(ret)?;
            Ok(handles)
        })
    }

    /// Position in meters, absolute or relative to `other`
    pub fn get_position(&self, other: Option<&SimObject<'_, R>>) -> Result<Vec3> {
        let client = self.client;
        let frame = frame_of(other);
        client.retry(&self.op("get_position"), || {
            let (ret, position) = client
                .api()
                .get_object_position(client.id(), self.handle, frame);
            check(ret)?;
            Ok(position)
        })
    }

    /// Euler angles, absolute or relative to `other`
    pub fn get_orientation(&self, other: Option<&SimObject<'_, R>>) -> Result<Vec3> {
        let client = self.client;
        let frame = frame_of(other);
        client.retry(&self.op("get_orientation"), || {
            let (ret, euler) = client
                .api()
                .get_object_orientation(client.id(), self.handle, frame);
            check(ret)?;
            Ok(euler)
        })
    }

    /// Linear and angular velocity
    pub fn get_velocity(&self) -> Result<(Vec3, Vec3)> {
        let client = self.client;
        client.retry(&self.op("get_velocity"), || {
            let (ret, linear, angular) = client.api().get_object_velocity(client.id(), self.handle);
            check(ret)?;
            Ok((linear, angular))
        })
    }

    /// Spherical coordinates of this object (plus `offset`) seen from `other`
    pub fn get_spherical(
        &self,
        other: Option<&SimObject<'_, R>>,
        offset: Vec3,
    ) -> Result<Spherical> {
        let p = self.get_position(other)?;
        Ok(Spherical::from_cartesian([
            p[0] + offset[0],
            p[1] + offset[1],
            p[2] + offset[2],
        ]))
    }

    /// Move the object, absolute or relative to `other`
    pub fn set_position(&self, position: Vec3, other: Option<&SimObject<'_, R>>) -> Result<()> {
        let client = self.client;
        let frame = frame_of(other);
        client.retry(&self.op("set_position"), || {
            check(
                client
                    .api()
                    .set_object_position(client.id(), self.handle, frame, position),
            )
        })
    }

    /// Set the absolute orientation (Euler angles)
    pub fn set_orientation(&self, euler: Vec3) -> Result<()> {
        let client = self.client;
        client.retry(&self.op("set_orientation"), || {
            check(client.api().set_object_orientation(
                client.id(),
                self.handle,
                ObjectHandle::WORLD,
                euler,
            ))
        })
    }

    /// Fetch the sensor's depth buffer, upright and normalized
    pub fn get_depth_buffer(&self) -> Result<DepthFrame> {
        if self.kind != ObjectKind::DepthSensor {
            return Err(SimError::NotADepthSensor(self.name.clone()));
        }

        let client = self.client;
        let (resolution, image) = client.retry(&self.op("get_depth_buffer"), || {
            let (ret, res, samples) = client
                .api()
                .get_vision_sensor_depth_buffer(client.id(), self.handle);
            check(ret)?;

            let width = u32::try_from(res[0]).unwrap_or(0);
            let height = u32::try_from(res[1]).unwrap_or(0);
            let image = from_sensor(width, height, samples)?;
            Ok(((width, height), image))
        })?;

        let image = match client.depth_resize() {
            Some([width, height]) => resize(&image, width, height),
            None => image,
        };

        Ok(DepthFrame { resolution, image })
    }

    /// Fetch the depth buffer and fill its holes by band-wise dilation
    ///
    /// `max_depth` is the sensor's far clipping distance in meters;
    /// `radius_fn` maps a depth in meters to a radius in pixels.
    pub fn get_dilated_depth<F>(&self, max_depth: f32, radius_fn: F) -> Result<DepthImage>
    where
        F: Fn(f32) -> i32,
    {
        if !(max_depth.is_finite() && max_depth > 0.0) {
            return Err(SimError::InvalidArgument(format!(
                "max_depth must be positive, got {}",
                max_depth
            )));
        }
        let frame = self.get_depth_buffer()?;
        Ok(dilate(&frame.image, max_depth, radius_fn))
    }
}
