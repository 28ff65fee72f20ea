//! Shared test fixtures for SSDP responses and ECP app listings.
//!
//! These constants are used by multiple test modules to avoid duplication.

/// SSDP search response from a Roku player.
pub const ROKU_SSDP_RESPONSE: &str = "HTTP/1.1 200 OK\r\n\
Cache-Control: max-age=3600\r\n\
ST: roku:ecp\r\n\
location: http://10.0.0.5:8060/\r\n\
USN: uuid:roku:ecp:ABC123\r\n\
Ext: \r\n\
Server: Roku/12.5.0 UPnP/1.0 Roku/12.5.0\r\n\
device-group.roku.com: 1A2B3C4D5E6F\r\n\
\r\n";

/// SSDP search response from a Sonos speaker answering the same probe.
pub const NON_ROKU_SSDP_RESPONSE: &str = "HTTP/1.1 200 OK\r\n\
CACHE-CONTROL: max-age=1800\r\n\
LOCATION: http://192.168.1.10:1400/xml/device_description.xml\r\n\
SERVER: Linux UPnP/1.0 Sonos/63.2-88230\r\n\
ST: urn:schemas-upnp-org:device:ZonePlayer:1\r\n\
USN: uuid:RINCON_ABC12345678901400::urn:schemas-upnp-org:device:ZonePlayer:1\r\n\
\r\n";

/// Builds a Roku response with the given `Cache-Control` value.
pub fn ssdp_response_with_cache_control(value: &str) -> String {
    format!(
        "HTTP/1.1 200 OK\r\n\
         Cache-Control: {}\r\n\
         ST: roku:ecp\r\n\
         location: http://10.0.0.5:8060/\r\n\
         USN: uuid:roku:ecp:ABC123\r\n\r\n",
        value
    )
}

/// `query/apps` body as returned by a Roku Ultra.
pub const APPS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>
<apps>
	<app id="2285" type="appl" version="6.81.0">Hulu</app>
	<app id="12" type="appl" version="4.2.100079005">Netflix</app>
	<app id="13535" type="appl" version="7.18.10">Plex - Free Movies &amp; TV</app>
	<app id="837" type="appl" version="2.20.110005159">YouTube</app>
	<app id="551012" type="appl" version="14.2.89">Apple TV</app>
	<app id="1980" type="appl" version="4.2.2036">Vimeo</app>
	<app id="151908" type="appl" version="9.3.10">The Roku Channel</app>
	<app id="23353" type="appl" version="5.6.1">PBS</app>
	<app id="13" type="appl" version="15.1.2024030812">Prime Video</app>
	<app id="164003" type="appl" version="2.16.306230007">Cartoon Network</app>
	<app id="143088" type="appl" version="3.94.3">BritBox</app>
	<app id="14295" type="appl" version="4.23.240318">Acorn TV</app>
	<app id="593099" type="appl" version="5.5.21">Peacock TV</app>
	<app id="22297" type="appl" version="2.11.67">Spotify Music</app>
	<app id="23048" type="appl" version="12.2.0">Spectrum TV</app>
	<app id="636527" type="appl" version="1.2.49">AMC+</app>
	<app id="683311" type="appl" version="10.3.17">Live TV Guide</app>
</apps>"#;

/// `query/active-app` body while Netflix is running.
pub const ACTIVE_APP_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>
<active-app>
	<app id="12" type="appl" version="4.2.100079005">Netflix</app>
</active-app>"#;

/// `query/active-app` body on the home screen (no app element).
pub const ACTIVE_APP_HOME_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>
<active-app>
	<app>Roku</app>
</active-app>"#;
