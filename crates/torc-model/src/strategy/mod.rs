mod restart;
pub use restart::RestartPolicy;

mod pull;
pub use pull::ImagePullPolicy;
