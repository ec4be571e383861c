mod integrator;
mod quaternion_euler;
mod exponential_map;

pub use self::integrator::Integrator;
pub use self::quaternion_euler::QuaternionEulerIntegrator;
pub use self::exponential_map::ExponentialMapIntegrator;
