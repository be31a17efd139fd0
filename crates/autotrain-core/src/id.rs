use slotmap::new_key_type;

new_key_type! {
    /// Identifies a station (train stop) in the network.
    pub struct StationId;

    /// Identifies a transport unit (train) in the network.
    pub struct UnitId;
}
