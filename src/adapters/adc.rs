//! One-shot ADC channel using raw ESP-IDF sys calls.
//!
//! `embedded-hal` 1.0 has no ADC trait, so the leak probe's analog input
//! is read through the IDF oneshot driver directly and exposed as an
//! [`AnalogChannel`].

use anyhow::{Result, bail};
use esp_idf_svc::sys::*;
use log::info;

use super::hal::AnalogChannel;
use crate::error::SensorError;

/// One ADC1 channel, 12-bit, full-range attenuation.
pub struct OneshotAdc {
    handle: adc_oneshot_unit_handle_t,
    channel: adc_channel_t,
}

impl OneshotAdc {
    /// Create the ADC1 unit and configure `channel` on it.
    pub fn new(channel: u32) -> Result<Self> {
        let init_cfg = adc_oneshot_unit_init_cfg_t {
            unit_id: adc_unit_t_ADC_UNIT_1,
            ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
            ..Default::default()
        };
        let mut handle: adc_oneshot_unit_handle_t = core::ptr::null_mut();
        // SAFETY: called once from main() before the poll loop starts.
        let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &mut handle) };
        if ret != ESP_OK as i32 {
            bail!("ADC1 init failed (rc={ret})");
        }

        let chan_cfg = adc_oneshot_chan_cfg_t {
            atten: adc_atten_t_ADC_ATTEN_DB_12,
            bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
        };
        // SAFETY: `handle` was just returned by adc_oneshot_new_unit.
        let ret = unsafe { adc_oneshot_config_channel(handle, channel, &chan_cfg) };
        if ret != ESP_OK as i32 {
            bail!("ADC1 channel {channel} config failed (rc={ret})");
        }

        info!("adc: ADC1 channel {} configured", channel);
        Ok(Self { handle, channel })
    }
}

impl AnalogChannel for OneshotAdc {
    fn sample(&mut self) -> Result<u16, SensorError> {
        let mut raw: i32 = 0;
        // SAFETY: handle is valid for the lifetime of `self`; single-threaded
        // main-loop access only.
        let ret = unsafe { adc_oneshot_read(self.handle, self.channel, &mut raw) };
        if ret != ESP_OK as i32 {
            return Err(SensorError::AdcReadFailed);
        }
        Ok(raw.max(0) as u16)
    }
}

impl Drop for OneshotAdc {
    fn drop(&mut self) {
        // SAFETY: handle came from adc_oneshot_new_unit and is released once.
        unsafe {
            adc_oneshot_del_unit(self.handle);
        }
    }
}
