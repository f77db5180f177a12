use crate::config::types::LocatorSettings;

fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Renders the Info.plist entries the discovery extension host checks against: the bluetooth service
/// the locator scans for, and the protocol type discovered devices are classified as.
pub fn render_info_plist(settings: &LocatorSettings) -> String {
    let service_id = settings.service_id.hyphenated().to_string().to_uppercase();
    let protocol_type = escape_xml(settings.protocol_type.as_str());

    format!(
r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
	<key>NSBluetoothServices</key>
	<array>
		<string>{service_id}</string>
	</array>
	<key>UTExportedTypeDeclarations</key>
	<array>
		<dict>
			<key>UTTypeIdentifier</key>
			<string>{protocol_type}</string>
			<key>UTTypeConformsTo</key>
			<array>
				<string>public.data</string>
			</array>
		</dict>
	</array>
</dict>
</plist>
"#,
        service_id = service_id,
        protocol_type = protocol_type,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::Config;

    #[test]
    fn plist_contains_configured_identifiers() {
        let settings = LocatorSettings::from_config(&Config::default()).unwrap();
        let plist = render_info_plist(&settings);

        assert!(plist.contains("<string>BBBD0575-9A37-4A78-86A0-9E1AC65E161A</string>"));
        assert!(plist.contains("<string>com.example.example-protocol</string>"));
    }

    #[test]
    fn service_id_is_upper_case() {
        let config = Config {
            service_id: "bc2f4cc6-aaef-4351-9034-d66268e328f0".to_string(),
            ..Config::default()
        };
        let plist = render_info_plist(&LocatorSettings::from_config(&config).unwrap());

        assert!(plist.contains("<string>BC2F4CC6-AAEF-4351-9034-D66268E328F0</string>"));
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_xml("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&apos;");
    }
}
