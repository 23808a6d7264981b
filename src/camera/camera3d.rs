use glamx::{Mat4, Vec2, Vec3, Vec4, Vec4Swizzles};

/// Trait that all camera implementations must implement.
///
/// Cameras control the viewpoint from which the 3D scene is rendered and
/// from which pointer rays are cast.
pub trait Camera3d {
    /// Returns the camera's position in world space.
    fn eye(&self) -> Vec3;

    /// Returns the view matrix (world space to camera space).
    fn view(&self) -> Mat4;

    /// Returns the projection matrix (camera space to clip space).
    fn projection(&self) -> Mat4;

    /// Returns the near and far clipping plane distances.
    fn clip_planes(&self) -> (f32, f32);

    /// Returns the combined projection and view transformation matrix.
    ///
    /// This matrix transforms points from world coordinates to normalized device coordinates (NDC).
    fn transformation(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Returns the inverse of the combined transformation matrix.
    fn inverse_transformation(&self) -> Mat4 {
        self.transformation().inverse()
    }

    /// Projects a 3D point in world coordinates to 2D screen coordinates.
    ///
    /// The returned coordinates are in pixels with the origin at the top-left
    /// corner, matching [`unproject`](Self::unproject).
    fn project(&self, world_coord: Vec3, size: Vec2) -> Vec2 {
        let h_world_coord = world_coord.extend(1.0);
        let h_normalized_coord = self.transformation() * h_world_coord;

        let normalized_coord = h_normalized_coord.xyz() / h_normalized_coord.w;

        Vec2::new(
            (1.0 + normalized_coord.x) * size.x / 2.0,
            (1.0 - normalized_coord.y) * size.y / 2.0,
        )
    }

    /// Casts a ray through a point given in normalized device coordinates
    /// (`x` rightward and `y` upward, both in `[-1, 1]`).
    ///
    /// Returns `(origin, direction)` where `origin` lies on the near plane and
    /// `direction` is normalized.
    fn unproject_ndc(&self, ndc: Vec2) -> (Vec3, Vec3) {
        let normalized_begin = Vec4::new(ndc.x, ndc.y, -1.0, 1.0);
        let normalized_end = Vec4::new(ndc.x, ndc.y, 1.0, 1.0);

        let cam = self.inverse_transformation();

        let h_unprojected_begin = cam * normalized_begin;
        let h_unprojected_end = cam * normalized_end;

        let unprojected_begin = h_unprojected_begin.xyz() / h_unprojected_begin.w;
        let unprojected_end = h_unprojected_end.xyz() / h_unprojected_end.w;

        (
            unprojected_begin,
            (unprojected_end - unprojected_begin).normalize(),
        )
    }

    /// Unprojects a 2D screen point (in pixels, origin at top-left) to a ray in world space.
    fn unproject(&self, window_coord: Vec2, size: Vec2) -> (Vec3, Vec3) {
        let normalized_coord = Vec2::new(
            2.0 * window_coord.x / size.x - 1.0,
            2.0 * -window_coord.y / size.y + 1.0,
        );

        self.unproject_ndc(normalized_coord)
    }
}
