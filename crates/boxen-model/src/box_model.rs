use serde::{Deserialize, Serialize};

use crate::ModelError;

pub const CREDENTIAL_PROTOCOL_PASSWORD: &str = "password";
pub const PORT_MODE_ACCESS: &str = "access";
pub const PORT_MODE_TRUNK: &str = "trunk";

fn default_credential_protocol() -> String {
    CREDENTIAL_PROTOCOL_PASSWORD.to_string()
}

fn default_port_speed() -> String {
    "1G".to_string()
}

fn default_port_auto_negotiation() -> bool {
    true
}

fn default_port_mtu() -> u32 {
    1500
}

fn default_vlan_port_mtu() -> u32 {
    1500
}

fn default_route_metric() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// Network device (AKA box) backing one simulated CLI.
pub struct BoxModel {
    pub vendor: String,
    pub model: String,
    pub version: String,
    pub uuid: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub mgmt_address: Option<String>,
    #[serde(default)]
    pub credentials: Vec<Credential>,
    #[serde(default)]
    pub ports: Vec<Port>,
    #[serde(default)]
    pub vlans: Vec<Vlan>,
    #[serde(default)]
    pub vlan_ports: Vec<VlanPort>,
    #[serde(default)]
    pub routes: Vec<Route>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credential {
    #[serde(default = "default_credential_protocol")]
    pub protocol: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl Credential {
    pub fn password(user: &str, password: &str) -> Self {
        Self {
            protocol: default_credential_protocol(),
            user: Some(user.to_string()),
            password: Some(password.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// Physical port.
pub struct Port {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub shutdown: bool,
    #[serde(default = "default_port_speed")]
    pub speed: String,
    #[serde(default = "default_port_auto_negotiation")]
    pub auto_negotiation: bool,
    #[serde(default = "default_port_mtu")]
    pub mtu: u32,
    #[serde(default)]
    pub access_vlan: Option<u16>,
    #[serde(default)]
    pub trunk_vlans: Vec<u16>,
    #[serde(default)]
    pub trunk_native_vlan: Option<u16>,
    #[serde(flatten)]
    pub features: PortFeatures,
}

/// Optional L2/L3 port settings. Serialized inline with the port, unset
/// values are left out.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PortFeatures {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vrf: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lldp_transmit: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lldp_receive: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lldp_med: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lldp_med_transmit_capabilities: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lldp_med_transmit_network_policy: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spanning_tree: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spanning_tree_portfast: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ntp: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_group_in: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_group_out: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vrrp_common_authentication: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vrrp_version: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_redirect: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_proxy_arp: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unicast_reverse_path_forwarding: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_interval: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mpls_ip: Option<String>,
}

impl Port {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            mode: None,
            shutdown: false,
            speed: default_port_speed(),
            auto_negotiation: default_port_auto_negotiation(),
            mtu: default_port_mtu(),
            access_vlan: None,
            trunk_vlans: Vec::new(),
            trunk_native_vlan: None,
            features: PortFeatures::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Vlan {
    pub number: u16,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// Routed VLAN interface (SVI), optionally bound to a physical port.
pub struct VlanPort {
    #[serde(alias = "vlan_id")]
    pub vlan_num: u16,
    #[serde(default)]
    pub port: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub shutdown: bool,
    #[serde(default = "default_vlan_port_mtu")]
    pub mtu: u32,
    #[serde(default)]
    pub access_group_in: Option<String>,
    #[serde(default)]
    pub access_group_out: Option<String>,
    #[serde(default)]
    pub ip_redirect: bool,
    #[serde(default)]
    pub ip_proxy_arp: bool,
    #[serde(default)]
    pub unicast_reverse_path_forwarding: bool,
    #[serde(default)]
    pub load_interval: Option<u32>,
    #[serde(default)]
    pub mpls_ip: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// Routing table entry.
pub struct Route {
    pub dst: String,
    pub gw: String,
    #[serde(default = "default_route_metric")]
    pub metric: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// How a VLAN is attached to a port.
pub enum VlanAttachment {
    Access,
    Trunk,
    TrunkNative,
}

impl BoxModel {
    pub fn new(vendor: &str, model: &str, version: &str, uuid: &str) -> Self {
        Self {
            vendor: vendor.to_string(),
            model: model.to_string(),
            version: version.to_string(),
            uuid: uuid.to_string(),
            description: None,
            hostname: None,
            mgmt_address: None,
            credentials: Vec::new(),
            ports: Vec::new(),
            vlans: Vec::new(),
            vlan_ports: Vec::new(),
            routes: Vec::new(),
        }
    }

    /// Credentials in model order.
    pub fn credentials(&self) -> impl Iterator<Item = &Credential> {
        self.credentials.iter()
    }

    pub fn ports(&self) -> impl Iterator<Item = &Port> {
        self.ports.iter()
    }

    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    pub fn find_port(&self, name: &str) -> Option<&Port> {
        self.find_port_by(|port| port.name == name)
    }

    pub fn find_port_by<F>(&self, predicate: F) -> Option<&Port>
    where
        F: Fn(&Port) -> bool,
    {
        self.ports.iter().find(|port| predicate(port))
    }

    pub fn find_vlan(&self, number: u16) -> Option<&Vlan> {
        self.vlans.iter().find(|vlan| vlan.number == number)
    }

    fn port_mut(&mut self, name: &str) -> Result<&mut Port, ModelError> {
        self.ports
            .iter_mut()
            .find(|port| port.name == name)
            .ok_or_else(|| ModelError::PortNotFound {
                name: name.to_string(),
            })
    }

    /// Declares a VLAN, renaming it when `name` is given and it already exists.
    pub fn ensure_vlan(&mut self, number: u16, name: Option<&str>) -> &Vlan {
        let index = match self.vlans.iter().position(|vlan| vlan.number == number) {
            Some(index) => index,
            None => {
                self.vlans.push(Vlan {
                    number,
                    name: None,
                    description: None,
                });
                self.vlans.len() - 1
            }
        };
        if let Some(name) = name {
            self.vlans[index].name = Some(name.to_string());
        }
        &self.vlans[index]
    }

    pub fn attach_vlan_to_port(
        &mut self,
        port_name: &str,
        vlan: u16,
        attachment: VlanAttachment,
    ) -> Result<(), ModelError> {
        self.port_mut(port_name)?;
        self.ensure_vlan(vlan, None);
        let port = self.port_mut(port_name)?;
        match attachment {
            VlanAttachment::Access => {
                port.mode = Some(PORT_MODE_ACCESS.to_string());
                port.access_vlan = Some(vlan);
            }
            VlanAttachment::Trunk => {
                port.mode = Some(PORT_MODE_TRUNK.to_string());
                if !port.trunk_vlans.contains(&vlan) {
                    port.trunk_vlans.push(vlan);
                    port.trunk_vlans.sort_unstable();
                }
            }
            VlanAttachment::TrunkNative => {
                port.mode = Some(PORT_MODE_TRUNK.to_string());
                port.trunk_native_vlan = Some(vlan);
            }
        }
        tracing::debug!(port = port_name, vlan, ?attachment, "attached vlan to port");
        Ok(())
    }

    pub fn set_port_shutdown(&mut self, port_name: &str, shutdown: bool) -> Result<(), ModelError> {
        self.port_mut(port_name)?.shutdown = shutdown;
        Ok(())
    }

    pub fn set_port_description(
        &mut self,
        port_name: &str,
        description: Option<&str>,
    ) -> Result<(), ModelError> {
        self.port_mut(port_name)?.description = description.map(str::to_string);
        Ok(())
    }

    pub fn set_port_mtu(&mut self, port_name: &str, mtu: u32) -> Result<(), ModelError> {
        self.port_mut(port_name)?.mtu = mtu;
        Ok(())
    }

    pub fn set_hostname(&mut self, hostname: &str) {
        self.hostname = Some(hostname.to_string());
    }

    /// Adds a route, replacing any entry with the same destination.
    pub fn add_route(&mut self, route: Route) {
        match self.routes.iter_mut().find(|entry| entry.dst == route.dst) {
            Some(existing) => *existing = route,
            None => self.routes.push(route),
        }
    }

    /// Returns whether a route for `dst` existed.
    pub fn remove_route(&mut self, dst: &str) -> bool {
        let before = self.routes.len();
        self.routes.retain(|route| route.dst != dst);
        self.routes.len() != before
    }
}
