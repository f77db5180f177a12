/**
 * The UUID of the Bluetooth BLE service to scan for.
 * This must match a value contained within the NSBluetoothServices array of the extension's Info.plist.
 */
pub const EXAMPLE_SERVICE: &str = "BBBD0575-9A37-4A78-86A0-9E1AC65E161A";

/**
 * The protocol type that discovered devices are classified as.
 * This must match the type declared in the extension's Info.plist.
 */
pub const EXAMPLE_PROTOCOL_TYPE: &str = "com.example.example-protocol";

/**
 * Display name used when a peripheral does not advertise a local name.
 */
pub const PLACEHOLDER_DEVICE_NAME: &str = "Unknown";

/**
 * Capacity of the futures channel used by `channel_handler` consumers.
 */
pub const EVENT_CHANNEL_CAPACITY: usize = 64;
