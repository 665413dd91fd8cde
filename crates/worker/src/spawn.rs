use std::sync::OnceLock;

use tokio::task::JoinHandle;

fn runtime_handle() -> tokio::runtime::Handle {
	if let Ok(handle) = tokio::runtime::Handle::try_current() {
		return handle;
	}

	static GLOBAL_RT: OnceLock<tokio::runtime::Runtime> = OnceLock::new();
	let runtime = GLOBAL_RT.get_or_init(|| {
		tokio::runtime::Builder::new_multi_thread()
			.enable_all()
			.worker_threads(1)
			.thread_name("scriptide-worker-global")
			.build()
			.expect("failed to build scriptide-worker global tokio runtime")
	});
	runtime.handle().clone()
}

/// Runs `f` on the blocking pool; `task` names the work in traces.
pub fn spawn_blocking<F, R>(task: &'static str, f: F) -> JoinHandle<R>
where
	F: FnOnce() -> R + Send + 'static,
	R: Send + 'static,
{
	tracing::trace!(task, "worker.spawn_blocking");
	runtime_handle().spawn_blocking(f)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn without_ambient_runtime_uses_global() {
		let handle = spawn_blocking("test.sum", || 21 * 2);
		let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
		assert_eq!(rt.block_on(handle).unwrap(), 42);
	}

	#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
	async fn uses_ambient_runtime() {
		let name = spawn_blocking("test.name", || std::thread::current().name().map(str::to_owned)).await.unwrap();
		assert_ne!(name.as_deref(), Some("scriptide-worker-global"));
	}
}
