// state.rs

use crate::*;

pub struct MyState {
    pub config: MyConfig,
    pub api_cnt: AtomicU64,
    pub gate: Arc<dyn AuthGate>,
    pub graphs: GraphInvoker,
    pub presenter: Presenter,
}

impl MyState {
    pub fn new(config: MyConfig) -> Self {
        let gate: Arc<dyn AuthGate> = if config.trust_all {
            warn!("Authentication disabled, every request is let in.");
            Arc::new(TrustAllGate {
                user: User {
                    name: "local".into(),
                    guest: false,
                },
            })
        } else {
            Arc::new(ProxyHeaderGate {
                header: config.auth_header.clone(),
                guest_user: config.guest_user.clone(),
            })
        };
        let renderer = Arc::new(ShellRenderer::new(config.graph_exec()));
        Self::with_parts(config, gate, renderer)
    }

    pub fn with_parts(
        config: MyConfig,
        gate: Arc<dyn AuthGate>,
        renderer: Arc<dyn GraphRenderer>,
    ) -> Self {
        let limit = Duration::from_secs(config.render_timeout_secs);
        MyState {
            presenter: Presenter {
                refresh_secs: config.refresh_secs,
            },
            graphs: GraphInvoker::new(renderer, limit),
            gate,
            api_cnt: AtomicU64::new(0),
            config,
        }
    }

    pub fn sensor_log(&self) -> SensorLog {
        SensorLog::new(self.config.sensor_log())
    }
}

// EOF
