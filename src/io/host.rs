//! cpal output stream driving a `RenderEngine`.

use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    BufferSize, SampleFormat, SampleRate, Stream, StreamConfig, SupportedBufferSize,
};
use tracing::{error, info, warn};

use crate::{
    error::EngineError,
    synth::{
        engine::{RenderEngine, RenderStatus, CHANNELS},
        message::MessageReceiver,
    },
};

/// Owns the running output stream. Dropping it stops audio.
pub struct AudioHost {
    stream: Stream,
    device_name: String,
    config: StreamConfig,
}

impl AudioHost {
    /// Open the default output device as interleaved stereo f32 at the
    /// engine's sample rate and start rendering.
    ///
    /// The engine moves into the audio callback; the caller keeps the
    /// parameter store and note producer to talk to it.
    pub fn start<R>(mut engine: RenderEngine<R>) -> Result<Self, EngineError>
    where
        R: MessageReceiver + Send + 'static,
    {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(EngineError::NoOutputDevice)?;
        let device_name = device.name().unwrap_or_else(|_| "unknown".to_string());

        let engine_config = engine.config();
        let sample_rate = SampleRate(engine_config.sample_rate);

        let range = device
            .supported_output_configs()?
            .filter(|c| c.channels() as usize == CHANNELS)
            .filter(|c| c.sample_format() == SampleFormat::F32)
            .find(|c| c.min_sample_rate() <= sample_rate && sample_rate <= c.max_sample_rate())
            .ok_or_else(|| {
                EngineError::UnsupportedConfig(format!(
                    "{CHANNELS}-channel f32 output at {} Hz",
                    engine_config.sample_rate
                ))
            })?;

        let block = engine_config.block_size as u32;
        let buffer_size = match range.buffer_size() {
            SupportedBufferSize::Range { min, max } if (*min..=*max).contains(&block) => {
                BufferSize::Fixed(block)
            }
            _ => {
                warn!(block, "device cannot use the requested block size, using its default");
                BufferSize::Default
            }
        };

        let config = StreamConfig {
            channels: CHANNELS as u16,
            sample_rate,
            buffer_size,
        };

        let stream = device.build_output_stream(
            &config,
            move |data: &mut [f32], _| {
                // Degraded blocks are already silenced; the stream keeps going.
                let _status: RenderStatus = engine.render(data, data.len() / CHANNELS);
            },
            |err| error!(%err, "audio stream error"),
            None,
        )?;

        stream.play()?;
        info!(
            device = %device_name,
            sample_rate = engine_config.sample_rate,
            ?buffer_size,
            "audio output started"
        );

        Ok(Self {
            stream,
            device_name,
            config,
        })
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    pub fn stop(&self) -> Result<(), EngineError> {
        self.stream.pause()?;
        info!(device = %self.device_name, "audio output paused");
        Ok(())
    }
}
