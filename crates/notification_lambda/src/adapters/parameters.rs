pub trait ParameterSource {
    fn get_parameter(&self, name: &str) -> Result<String, String>;
}
