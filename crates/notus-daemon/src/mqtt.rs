//! MQTT transport (C8 concrete binding): a thin `rumqttc` adapter over the
//! [`notus_messaging::Publisher`] contract plus a blocking subscriber loop.
//! Grounded in `messaging/mqtt.py`'s `MQTTClient`/`MQTTPublisher`/
//! `MQTTSubscriber`/`MQTTDaemon` -- same client id, same QoS, same
//! resubscribe-on-reconnect behavior, re-expressed over `rumqttc`'s blocking
//! client instead of paho-mqtt's callback-driven one.

use std::time::Duration;

use rumqttc::{Client, Connection, Event, Incoming, MqttOptions, QoS};

use notus_messaging::{OutboundMessage, Publisher, ScanStartMessage, Subscriber};

/// Matches `NOTUS_MQTT_CLIENT_ID` in the original source.
const CLIENT_ID: &str = "notus-scanner";

/// A connected MQTT client/connection pair. Implements both
/// [`notus_messaging::Publisher`] (via [`MqttPublisher`], built from
/// `client.clone()`) and [`Subscriber`] directly, so the daemon wires
/// itself against the bus adapter interface rather than the `rumqttc`
/// types underneath it (spec §6 C8: publisher/subscriber contracts).
pub struct MqttTransport {
    pub client: Client,
    connection: Option<Connection>,
}

impl MqttTransport {
    pub fn connect(
        broker_address: &str,
        broker_port: u16,
        username: Option<&str>,
        password: Option<&str>,
    ) -> anyhow::Result<Self> {
        let mut options = MqttOptions::new(CLIENT_ID, broker_address, broker_port);
        options.set_keep_alive(Duration::from_secs(60));
        if let (Some(user), Some(pass)) = (username, password) {
            options.set_credentials(user, pass);
        }
        let (client, connection) = Client::new(options, 64);
        Ok(Self {
            client,
            connection: Some(connection),
        })
    }
}

impl Subscriber for MqttTransport {
    /// Drive the blocking MQTT event loop on a dedicated thread, handing
    /// every `scan.start` payload on the subscribed topic to `handler`.
    /// Resubscribes on every `ConnAck`, mirroring `MQTTSubscriber.on_connect`'s
    /// defense against a broker-side reconnect dropping subscriptions.
    ///
    /// Consumes the connection: a second call after the first returns an
    /// error rather than silently doing nothing, since only one event loop
    /// can drain a given `Connection`.
    fn subscribe_scan_start(
        &mut self,
        mut handler: Box<dyn FnMut(ScanStartMessage) + Send>,
    ) -> anyhow::Result<()> {
        let Some(mut connection) = self.connection.take() else {
            anyhow::bail!("mqtt connection already consumed by a prior subscribe call");
        };
        let client = self.client.clone();

        std::thread::spawn(move || {
            for notification in connection.iter() {
                match notification {
                    Ok(Event::Incoming(Incoming::ConnAck(_))) => {
                        if let Err(error) = client.subscribe(ScanStartMessage::TOPIC, QoS::AtLeastOnce) {
                            tracing::error!(%error, "failed to (re)subscribe to scan.start topic");
                        }
                    }
                    Ok(Event::Incoming(Incoming::Publish(publish))) => {
                        if publish.topic != ScanStartMessage::TOPIC {
                            continue;
                        }
                        match ScanStartMessage::parse(&publish.payload) {
                            Ok(message) => handler(message),
                            Err(error) => {
                                tracing::error!(%error, topic = %publish.topic, "could not parse scan.start message");
                            }
                        }
                    }
                    Ok(_) => {}
                    Err(error) => {
                        tracing::warn!(%error, "mqtt connection error");
                    }
                }
            }
        });
        Ok(())
    }
}

/// Publishes scan-status and result messages with at-least-once delivery,
/// matching `MQTTPublisher.publish`'s fixed QoS.
pub struct MqttPublisher(pub Client);

impl Publisher for MqttPublisher {
    fn publish(&self, message: &OutboundMessage) -> anyhow::Result<()> {
        let payload = message.to_json()?;
        tracing::debug!(topic = message.topic(), "publishing message");
        self.0.publish(message.topic(), QoS::AtLeastOnce, false, payload)?;
        Ok(())
    }
}
