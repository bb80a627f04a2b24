use std::f32::consts::PI;


pub const FFT_SIZE: usize = 2048;
pub const HOP_SIZE: usize = FFT_SIZE / 4;
pub const FRAMES_PER_YIELD: usize = 50;

#[derive(Debug, Clone)]
pub struct Spectrogram {
    columns: Vec<Vec<f32>>,
    freq_bins: usize,
    max_magnitude: f32,
}

impl Spectrogram {
    pub fn from_columns(columns: Vec<Vec<f32>>, freq_bins: usize) -> Spectrogram {
        let max_magnitude = columns.iter().flatten().copied().fold(0.0, f32::max);
        Spectrogram {
            columns,
            freq_bins,
            max_magnitude,
        }
    }

    pub fn columns(&self) -> &[Vec<f32>] {
        &self.columns
    }

    pub fn num_frames(&self) -> usize {
        self.columns.len()
    }

    pub fn freq_bins(&self) -> usize {
        self.freq_bins
    }

    pub fn max_magnitude(&self) -> f32 {
        self.max_magnitude
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

pub fn hamming_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|k| 0.54 - 0.46 * (2.0 * PI * k as f32 / size as f32).cos())
        .collect()
}

pub fn apply_window(frame: &[f32], window: &[f32]) -> Vec<f32> {
    frame
        .iter()
        .zip(window)
        .map(|(&sample, &coefficient)| sample * coefficient)
        .collect()
}

pub fn magnitude_spectrum(frame: &[f32]) -> Vec<f32> {
    let n = frame.len();
    if n <= 1 {
        return frame.iter().map(|sample| sample.abs()).collect();
    }
    debug_assert!(n.is_power_of_two());

    let mut real = frame.to_vec();
    let mut imag = vec![0.0f32; n];

    // Bit-reversal permutation with an incrementally maintained counter.
    let mut j = 0;
    for i in 0..n - 1 {
        if i < j {
            real.swap(i, j);
            imag.swap(i, j);
        }
        let mut k = n / 2;
        while k <= j {
            j -= k;
            k /= 2;
        }
        j += k;
    }

    // The twiddle factor rotates incrementally within each block, so the
    // trigonometric calls run once per stage.
    let mut len = 2;
    while len <= n {
        let half = len / 2;
        let angle = -2.0 * PI / len as f32;
        let step_re = angle.cos();
        let step_im = angle.sin();
        for base in (0..n).step_by(len) {
            let mut w_re = 1.0f32;
            let mut w_im = 0.0f32;
            for k in 0..half {
                let u_re = real[base + k];
                let u_im = imag[base + k];
                let v_re = real[base + k + half] * w_re - imag[base + k + half] * w_im;
                let v_im = real[base + k + half] * w_im + imag[base + k + half] * w_re;
                real[base + k] = u_re + v_re;
                imag[base + k] = u_im + v_im;
                real[base + k + half] = u_re - v_re;
                imag[base + k + half] = u_im - v_im;
                let rotated = w_re * step_re - w_im * step_im;
                w_im = w_re * step_im + w_im * step_re;
                w_re = rotated;
            }
        }
        len *= 2;
    }

    // The upper half of a real-input spectrum mirrors the lower half.
    (0..n / 2)
        .map(|i| (real[i] * real[i] + imag[i] * imag[i]).sqrt())
        .collect()
}

pub struct SpectrogramBuilder {
    fft_size: usize,
    hop_size: usize,
    window: Vec<f32>,
}

impl Default for SpectrogramBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SpectrogramBuilder {
    pub fn new() -> SpectrogramBuilder {
        SpectrogramBuilder::with_fft_size(FFT_SIZE)
    }

    pub fn with_fft_size(fft_size: usize) -> SpectrogramBuilder {
        assert!(fft_size.is_power_of_two());
        SpectrogramBuilder {
            fft_size,
            hop_size: fft_size / 4,
            window: hamming_window(fft_size),
        }
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    pub fn num_frames(&self, sample_count: usize) -> usize {
        sample_count.saturating_sub(self.fft_size) / self.hop_size
    }

    pub fn build(&self, samples: &[f32]) -> Spectrogram {
        self.build_with(samples, |_| {})
    }

    pub fn build_with(&self, samples: &[f32], mut on_chunk: impl FnMut(usize)) -> Spectrogram {
        let num_frames = self.num_frames(samples.len());
        let freq_bins = self.fft_size / 2;
        let mut columns = Vec::with_capacity(num_frames);
        let mut max_magnitude = 0.0f32;
        for t in 0..num_frames {
            let offset = t * self.hop_size;
            let windowed = apply_window(&samples[offset..offset + self.fft_size], &self.window);
            let magnitudes = magnitude_spectrum(&windowed);
            max_magnitude = magnitudes.iter().copied().fold(max_magnitude, f32::max);
            columns.push(magnitudes);
            if (t + 1) % FRAMES_PER_YIELD == 0 {
                let _ = rayon::yield_now();
                on_chunk(t + 1);
            }
        }
        Spectrogram {
            columns,
            freq_bins,
            max_magnitude,
        }
    }
}
