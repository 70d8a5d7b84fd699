use leptos::*;

use crate::{components::layout::Layout, state::session::use_session};

#[component]
pub fn HomePage() -> impl IntoView {
    let signed_in = use_session().map(|ctx| ctx.is_signed_in()).unwrap_or(false);
    view! {
        <Layout>
            <div class="text-center py-12">
                <h1 class="text-4xl font-extrabold text-fg">"AIS Officers Portal"</h1>
                <p class="mt-3 text-fg-muted">
                    "Profiles, documents and services for All India Services officers"
                </p>
                <Show when=move || !signed_in>
                    <a href="/login" class="mt-6 inline-flex px-8 py-3 rounded-md text-action-primary-text bg-action-primary-bg">
                        "Sign in"
                    </a>
                </Show>
            </div>
        </Layout>
    }
}
