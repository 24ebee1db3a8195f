/// All tunable parameters — exposed as UI sliders in the frontend.
#[derive(Clone, Debug)]
pub struct Params {
    // Horizon radius slider range (simulation units)
    pub min_radius: f64,
    pub max_radius: f64,
    pub default_radius: f64,

    // Field sampling
    pub grid_resolution: usize,
    pub domain_half_extent: f64,

    // Contour granularity: finer step = more rings = higher render cost
    pub contour_step: f64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            min_radius: 0.1,
            max_radius: 1.8,
            default_radius: 1.0,
            grid_resolution: 120,
            domain_half_extent: 2.2,
            contour_step: 0.05,
        }
    }
}
