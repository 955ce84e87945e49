use leptos::prelude::*;
use leptos_router::hooks::use_query_map;

use crate::components::mesh::MeshCanvas;
use crate::mesh::MeshConfig;

/// Default Home Page
///
/// The mesh is configured from the query string, e.g.
/// `/?topology=torus&rows=9&cols=15&seed=7`.
#[component]
pub fn Home() -> impl IntoView {
	let query = use_query_map();
	let config = Signal::derive(move || {
		let params = query.get();
		MeshConfig::default().with_overrides(|key| params.get(key))
	});

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<MeshCanvas config=config fullscreen=true />
				<div class="graph-overlay">
					<h1>"Heat Mesh"</h1>
					<p class="subtitle">"Move the pointer to heat the mesh. Drag nodes to pull it. Double-click a node to remove it."</p>
				</div>
			</div>
		</ErrorBoundary>
	}
}
