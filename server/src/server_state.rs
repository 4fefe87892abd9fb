use scan_report_data_management::DataManager;

pub struct ServerState<S> {
    pub data_manager: DataManager<S>,
    // Shown on `/`.
    pub default_country: String,
}

impl<S> ServerState<S> {
    pub fn new(data_manager: DataManager<S>, default_country: impl Into<String>) -> Self {
        Self {
            data_manager,
            default_country: default_country.into(),
        }
    }
}
