use crate::engine::systems::fps_tracking::smoothed_fps;
use crate::interaction::dispatch::InteractionSource;
use crate::interaction::doors::{DoorAction, DoorCommand, DoorRegistry};
use crate::interaction::exhibits::{ExhibitRegistry, ExhibitSelected, InfoModalState};
use bevy::diagnostic::DiagnosticsStore;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// Request posted by the host page. `params` may be omitted.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// Reply to a request that carried an `id`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// Walkthrough event pushed to the host page unprompted.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC 2.0 error object.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Resource managing bidirectional RPC communication between the host page and Bevy.
/// Outbox for the host page, flushed once per frame.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Queue a walkthrough event for the host page.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    /// Queue a reply to a host request.
    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }

    #[cfg(test)]
    pub fn pending_notifications(&self) -> usize {
        self.outgoing_notifications.len()
    }
}

/// Bridge between the walkthrough and the page embedding it.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<HostMessage>()
            .add_systems(
                Update,
                (
                    process_incoming_messages,
                    handle_rpc_messages,
                    send_outgoing_messages,
                )
                    .chain(),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::Arc;
    use std::sync::Mutex;

    // Filled by the JS callback, drained by `process_incoming_messages`.
    let inbox: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let listener_inbox = inbox.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        // Only string payloads that look like JSON-RPC are queued.
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let payload: String = data.into();
            if payload.contains("jsonrpc") {
                if let Ok(mut queue) = listener_inbox.lock() {
                    queue.push(payload);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    if let Some(window) = window() {
        if let Err(e) =
            window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
        {
            error!("Failed to register message listener: {:?}", e);
        }
    }

    // The listener lives as long as the page.
    closure.forget();
    commands.insert_resource(HostInbox(inbox));
}

/// Raw payloads received since the last frame.
#[derive(Resource)]
struct HostInbox(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

/// One raw payload from the host page.
#[derive(Event)]
struct HostMessage {
    content: String,
}

/// World access the request handlers need.
#[derive(SystemParam)]
pub struct RpcContext<'w> {
    diagnostics: Res<'w, DiagnosticsStore>,
    doors: Option<Res<'w, DoorRegistry>>,
    exhibits: Option<Res<'w, ExhibitRegistry>>,
    modal: ResMut<'w, InfoModalState>,
    door_commands: EventWriter<'w, DoorCommand>,
    exhibit_events: EventWriter<'w, ExhibitSelected>,
}

fn process_incoming_messages(
    inbox: Option<Res<HostInbox>>,
    mut host_messages: EventWriter<HostMessage>,
) {
    let Some(inbox) = inbox else {
        return;
    };

    let messages = if let Ok(mut queue) = inbox.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    for payload in messages {
        host_messages.write(HostMessage {
            content: payload,
        });
    }
}

fn handle_rpc_messages(
    mut events: EventReader<HostMessage>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut context: RpcContext,
) {
    for event in events.read() {
        match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => {
                debug!("Processing RPC method: {}", request.method);
                if let Some(response) = handle_rpc_request(&request, &mut context) {
                    rpc_interface.queue_response(response);
                }
            }
            Err(parse_error) => {
                warn!("Unparseable RPC message: {}", parse_error);
                rpc_interface.send_notification(
                    "debug_message",
                    serde_json::json!({
                        "message": format!("Parse error: {}", parse_error)
                    }),
                );
            }
        }
    }
}

/// Handle individual RPC request and generate response based on method.
fn handle_rpc_request(request: &RpcRequest, context: &mut RpcContext) -> Option<RpcResponse> {
    let result = match request.method.as_str() {
        "get_fps" => handle_get_fps(&context.diagnostics),
        "get_doors" => handle_get_doors(context.doors.as_deref()),
        "toggle_door" => handle_toggle_door(
            &request.params,
            context.doors.as_deref(),
            &mut context.door_commands,
        ),
        "show_exhibit" => handle_show_exhibit(
            &request.params,
            context.exhibits.as_deref(),
            &mut context.exhibit_events,
        ),
        "close_info" => handle_close_info(&mut context.modal),
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            return request.id.clone().map(|id| {
                create_error_response(
                    id,
                    -32601,
                    "Method not found",
                    Some(serde_json::json!({"method": request.method})),
                )
            });
        }
    };

    // Notifications (no ID) get no response, but their side effects still apply.
    let id = request.id.clone()?;
    match result {
        Ok(result_value) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        }),
        Err(error) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        }),
    }
}

/// Handle FPS retrieval with diagnostic system integration.
fn handle_get_fps(diagnostics: &DiagnosticsStore) -> Result<serde_json::Value, RpcError> {
    let fps = smoothed_fps(diagnostics).unwrap_or(0.0) as f32;

    Ok(serde_json::json!({
        "fps": fps
    }))
}

fn handle_get_doors(doors: Option<&DoorRegistry>) -> Result<serde_json::Value, RpcError> {
    let doors = doors.ok_or_else(|| RpcError::internal_error("Scene not ready"))?;
    let states: Vec<serde_json::Value> = doors
        .states()
        .map(|(id, opened)| serde_json::json!({ "id": id, "opened": opened }))
        .collect();

    Ok(serde_json::json!({
        "doors": states
    }))
}

/// Toggle a door by layout id, exactly as a click on it would.
fn handle_toggle_door(
    params: &serde_json::Value,
    doors: Option<&DoorRegistry>,
    door_commands: &mut EventWriter<DoorCommand>,
) -> Result<serde_json::Value, RpcError> {
    #[derive(serde::Deserialize)]
    struct ToggleDoorParams {
        door: String,
    }

    let door_params = serde_json::from_value::<ToggleDoorParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'door' parameter"))?;

    let doors = doors.ok_or_else(|| RpcError::internal_error("Scene not ready"))?;
    let door = doors
        .find(&door_params.door)
        .ok_or_else(|| RpcError::invalid_params(&format!("Unknown door: {}", door_params.door)))?;

    door_commands.write(DoorCommand {
        door,
        action: DoorAction::Toggle,
        source: InteractionSource::Rpc,
    });

    Ok(serde_json::json!({
        "success": true,
        "door": door_params.door
    }))
}

fn handle_show_exhibit(
    params: &serde_json::Value,
    exhibits: Option<&ExhibitRegistry>,
    exhibit_events: &mut EventWriter<ExhibitSelected>,
) -> Result<serde_json::Value, RpcError> {
    #[derive(serde::Deserialize)]
    struct ShowExhibitParams {
        mesh: String,
    }

    let exhibit_params = serde_json::from_value::<ShowExhibitParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'mesh' parameter"))?;

    let exhibits = exhibits.ok_or_else(|| RpcError::internal_error("Scene not ready"))?;
    let exhibit = exhibits
        .find_by_mesh(&exhibit_params.mesh)
        .ok_or_else(|| {
            RpcError::invalid_params(&format!("Unknown exhibit: {}", exhibit_params.mesh))
        })?;

    exhibit_events.write(ExhibitSelected {
        exhibit,
        source: InteractionSource::Rpc,
    });

    Ok(serde_json::json!({
        "success": true,
        "mesh": exhibit_params.mesh
    }))
}

fn handle_close_info(modal: &mut InfoModalState) -> Result<serde_json::Value, RpcError> {
    Ok(serde_json::json!({
        "closed": modal.close()
    }))
}

/// Create standardized error response with optional data payload.
fn create_error_response(
    id: serde_json::Value,
    code: i32,
    message: &str,
    data: Option<serde_json::Value>,
) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0".to_string(),
        result: None,
        error: Some(RpcError {
            code,
            message: message.to_string(),
            data,
        }),
        id: Some(id),
    }
}

/// Send queued notifications and responses to the host page.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    // Send notifications first.
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }

    // Send responses second to maintain order.
    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

/// Send serialized message to parent window.
fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    } else {
                        warn!("No parent window available for message transmission");
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        // No host page on native builds.
        let _ = message;
    }
}

/// Standard RPC error codes and constructors.
impl RpcError {
    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn internal_error(message: &str) -> Self {
        Self {
            code: -32603,
            message: message.to_string(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::museum_layout::{DoorLayout, DoorSwing};
    use bevy::ecs::system::RunSystemOnce;

    fn rpc_world() -> World {
        let mut world = World::new();
        world.init_resource::<WebRpcInterface>();
        world.init_resource::<DiagnosticsStore>();
        world.init_resource::<InfoModalState>();
        world.init_resource::<Events<HostMessage>>();
        world.init_resource::<Events<DoorCommand>>();
        world.init_resource::<Events<ExhibitSelected>>();

        let leaf = world.spawn_empty().id();
        let hinge = world.spawn_empty().id();
        let mut doors = DoorRegistry::default();
        doors.register(
            &DoorLayout {
                id: "main_door_left".into(),
                leaf: "Box111".into(),
                hinge: "Box112".into(),
                swing: DoorSwing::Left,
                open_on_click: true,
            },
            leaf,
            hinge,
        );
        world.insert_resource(doors);
        world
    }

    fn call(world: &mut World, message: serde_json::Value) -> RpcResponse {
        world.send_event(HostMessage {
            content: message.to_string(),
        });
        world
            .run_system_once(handle_rpc_messages)
            .expect("rpc handler");
        world
            .resource_mut::<WebRpcInterface>()
            .outgoing_responses
            .pop()
            .expect("response queued")
    }

    #[test]
    fn get_doors_lists_states() {
        let mut world = rpc_world();
        let response = call(
            &mut world,
            serde_json::json!({"jsonrpc": "2.0", "method": "get_doors", "id": 1}),
        );
        assert_eq!(
            response.result,
            Some(serde_json::json!({"doors": [{"id": "main_door_left", "opened": false}]}))
        );
    }

    #[test]
    fn toggle_door_dispatches_a_command() {
        let mut world = rpc_world();
        let response = call(
            &mut world,
            serde_json::json!({
                "jsonrpc": "2.0", "method": "toggle_door",
                "params": {"door": "main_door_left"}, "id": 2
            }),
        );
        assert!(response.error.is_none());

        let commands: Vec<DoorCommand> = world
            .resource::<Events<DoorCommand>>()
            .iter_current_update_events()
            .copied()
            .collect();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].source, InteractionSource::Rpc);
        assert_eq!(commands[0].action, DoorAction::Toggle);
    }

    #[test]
    fn unknown_door_is_an_invalid_param() {
        let mut world = rpc_world();
        let response = call(
            &mut world,
            serde_json::json!({
                "jsonrpc": "2.0", "method": "toggle_door",
                "params": {"door": "vault"}, "id": 3
            }),
        );
        assert_eq!(response.error.map(|e| e.code), Some(-32602));
    }

    #[test]
    fn unknown_method_is_reported() {
        let mut world = rpc_world();
        let response = call(
            &mut world,
            serde_json::json!({"jsonrpc": "2.0", "method": "fly", "id": 4}),
        );
        assert_eq!(response.error.map(|e| e.code), Some(-32601));
    }

    #[test]
    fn notifications_get_no_response() {
        let mut world = rpc_world();
        world.send_event(HostMessage {
            content: serde_json::json!({"jsonrpc": "2.0", "method": "close_info"}).to_string(),
        });
        world
            .run_system_once(handle_rpc_messages)
            .expect("rpc handler");
        assert!(world.resource::<WebRpcInterface>().outgoing_responses.is_empty());
    }
}
