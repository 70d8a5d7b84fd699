use leptos::*;
use leptos_meta::{provide_meta_context, Title};
use leptos_router::*;
use log::{info, warn};

mod components;
pub mod config;
mod pages;
pub mod session;
mod state;
#[cfg(test)]
mod test_support;
pub mod utils;

use components::guard::SessionGuard;
use pages::{home::HomePage, portal::PortalPage, unauthorized::UnauthorizedPage};

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Debug).is_err() {
        warn!("Logger already initialized");
    }
    info!("Starting AIS portal frontend");

    // The guard needs the resolved route table, so mount only after config.
    leptos::spawn_local(async move {
        let config = config::init().await;
        info!(
            "Access config ready: {} roles, {} public routes",
            config.role_routes.len(),
            config.public_routes.len()
        );
        mount_to_body(|| view! { <App/> });
    });
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();
    view! {
        <Title text="AIS Portal"/>
        <Router>
            <Routes>
                <Route path="" view=GuardedLayout>
                    <Route path="/" view=HomePage/>
                    <Route path="/unauthorized" view=UnauthorizedPage/>
                    <Route path="/*any" view=PortalPage/>
                </Route>
            </Routes>
        </Router>
    }
}

/// Keeps one guard alive across navigation between guarded routes.
#[component]
fn GuardedLayout() -> impl IntoView {
    let location = use_location();
    let path = Signal::derive(move || location.pathname.get());
    view! {
        <SessionGuard path=path>
            <Outlet/>
        </SessionGuard>
    }
}
