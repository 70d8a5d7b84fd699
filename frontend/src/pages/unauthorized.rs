use leptos::*;

use crate::state::session::use_logout;

#[component]
pub fn UnauthorizedPage() -> impl IntoView {
    let logout = use_logout();
    view! {
        <div class="min-h-screen flex items-center justify-center bg-surface">
            <div class="text-center space-y-4">
                <h1 class="text-3xl font-bold text-fg">"Access denied"</h1>
                <p class="text-fg-muted">"Your role does not have access to this page."</p>
                <div class="space-x-4">
                    <a href="/" class="text-action-primary-bg underline">"Back to home"</a>
                    <button on:click=move |_| logout() class="text-fg-muted underline">
                        "Sign in as a different user"
                    </button>
                </div>
            </div>
        </div>
    }
}
