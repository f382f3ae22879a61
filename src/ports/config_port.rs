//! Configuration access port trait.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    /// All section names, in the case they were written.
    fn sections(&self) -> Vec<String>;
}
