//! Configuration access port trait.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;

    /// All `key = value` pairs of a section in file order; empty when the
    /// section is absent.
    fn get_section(&self, section: &str) -> Vec<(String, String)>;

    fn has_section(&self, section: &str) -> bool {
        !self.get_section(section).is_empty()
    }
}
